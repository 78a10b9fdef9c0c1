use color_eyre::eyre;
use interface::{AssetRef, AssetType, Identity, ListOptions, NewTransaction, Transaction, TransactionType};
use structopt::StructOpt;
use tracing::info;

use ledger::auth::{identity_provider, issue_token, ttl_from_hours};
use ledger::server::{start_server, AppState};
use ledger::{AppConfig, TransactionService};

#[derive(Debug, StructOpt)]
#[structopt(name = "ledger", about = "Investment transaction ledger")]
struct Opt {
    /// Act as this user id (required when a database is configured)
    #[structopt(long)]
    user: Option<String>,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Overrides LEDGER_API_PORT
        #[structopt(long)]
        port: Option<u16>,
    },
    /// Record a buy or sell
    Record {
        #[structopt(long)]
        asset_id: String,
        #[structopt(long)]
        asset_name: String,
        #[structopt(long)]
        symbol: String,
        /// stock, mf, crypto or bond
        #[structopt(long)]
        asset_type: AssetType,
        /// buy or sell
        #[structopt(long)]
        side: TransactionType,
        #[structopt(long)]
        quantity: f64,
        #[structopt(long)]
        amount: f64,
        #[structopt(long)]
        price: f64,
        #[structopt(long)]
        fees: Option<f64>,
        #[structopt(long)]
        notes: Option<String>,
        #[structopt(long)]
        platform: Option<String>,
        #[structopt(long)]
        status: Option<String>,
    },
    /// Show transaction history, newest first
    List {
        #[structopt(long)]
        asset_type: Option<AssetType>,
        #[structopt(long)]
        side: Option<TransactionType>,
        #[structopt(long)]
        limit: Option<u64>,
        #[structopt(long)]
        json: bool,
    },
    /// Show one transaction
    Show {
        id: String,
        #[structopt(long)]
        json: bool,
    },
    /// Buy/sell totals and net investment
    Stats {
        #[structopt(long)]
        json: bool,
    },
    /// Issue a bearer token for --user
    Token {
        #[structopt(long, default_value = "24")]
        ttl_hours: i64,
    },
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // init error reporting
    color_eyre::install()?;

    dotenv::dotenv().ok();

    let opt = Opt::from_args();
    let config = AppConfig::from_env();

    // init logging
    let _guards = ledger::logger::init_tracing(&config);

    if let Command::Token { ttl_hours } = opt.cmd {
        return print_token(&config, opt.user, ttl_hours);
    }

    let store = ledger::record::open_store(&config)
        .await
        .map_err(|e| eyre::eyre!("Failed to open transaction store: {}", e))?;

    let service = TransactionService::new(
        store.clone(),
        identity_provider(opt.user.map(Identity::new)),
    );

    match opt.cmd {
        Command::Serve { port } => {
            let port = port.unwrap_or(config.api_port);
            start_server(port, AppState::new(store, config.jwt_secret.clone())).await?;
        }
        Command::Record {
            asset_id,
            asset_name,
            symbol,
            asset_type,
            side,
            quantity,
            amount,
            price,
            fees,
            notes,
            platform,
            status,
        } => {
            let mut data = NewTransaction::new(
                AssetRef {
                    id: asset_id,
                    name: asset_name,
                    symbol,
                    asset_type,
                },
                side,
                quantity,
                amount,
                price,
            );
            data.fees = fees;
            data.notes = notes;
            data.platform = platform;
            data.status = status;

            let tx = service.record(data).await?;
            info!("Recorded transaction {}", tx.id);
            print_transactions(&[tx], false)?;
        }
        Command::List {
            asset_type,
            side,
            limit,
            json,
        } => {
            let options = ListOptions {
                asset_type,
                transaction_type: side,
                limit,
            };
            let transactions = service.list_for_user(&options).await?;
            print_transactions(&transactions, json)?;
        }
        Command::Show { id, json } => {
            let tx = service.get_by_id(&id).await?;
            print_transactions(&[tx], json)?;
        }
        Command::Stats { json } => {
            let stats = service.get_stats().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Transactions:    {}", stats.total_transactions);
                println!("Total bought:    {:.2}", stats.total_buy_amount);
                println!("Total sold:      {:.2}", stats.total_sell_amount);
                println!("Net investment:  {:.2}", stats.net_investment);
            }
        }
        // handled before the store is opened
        Command::Token { .. } => {}
    }

    Ok(())
}

fn print_token(config: &AppConfig, user: Option<String>, ttl_hours: i64) -> eyre::Result<()> {
    let uid = user.ok_or_else(|| eyre::eyre!("--user is required to issue a token"))?;
    let secret = config
        .jwt_secret
        .as_deref()
        .ok_or_else(|| eyre::eyre!("LEDGER_JWT_SECRET is not set"))?;

    let ttl = ttl_from_hours(ttl_hours)?;
    let token = issue_token(&Identity::new(uid), secret, ttl)?;
    println!("{}", token);
    Ok(())
}

fn print_transactions(transactions: &[Transaction], json: bool) -> eyre::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(transactions)?);
        return Ok(());
    }

    if transactions.is_empty() {
        println!("No transaction history found.");
        return Ok(());
    }

    println!(
        "{:<38} {:<10} {:<5} {:>12} {:>14}  {}",
        "ID", "SYMBOL", "SIDE", "QUANTITY", "AMOUNT", "DATE"
    );
    for tx in transactions {
        let date = tx
            .timestamp
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<38} {:<10} {:<5} {:>12} {:>14.2}  {}",
            tx.id,
            tx.asset.symbol,
            tx.transaction_type.to_string().to_uppercase(),
            tx.quantity,
            tx.amount,
            date
        );
    }

    Ok(())
}
