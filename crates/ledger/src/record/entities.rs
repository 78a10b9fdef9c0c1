/// Transaction entity, table `transactions`
pub mod transaction_record {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "transactions")]
    pub struct Model {
        /// Store assigned UUID
        #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
        pub id: String,

        /// Owner uid, never changes after insert
        #[sea_orm(column_type = "Text")]
        pub user_id: String,

        #[sea_orm(column_type = "Text")]
        pub asset_id: String,

        #[sea_orm(column_type = "Text")]
        pub asset_name: String,

        #[sea_orm(column_type = "Text")]
        pub asset_symbol: String,

        /// stock, mf, crypto, bond
        #[sea_orm(column_type = "Text")]
        pub asset_type: String,

        /// buy, sell
        #[sea_orm(column_type = "Text")]
        pub transaction_type: String,

        #[sea_orm(column_type = "Double")]
        pub quantity: f64,

        #[sea_orm(column_type = "Double")]
        pub amount: f64,

        #[sea_orm(column_type = "Double")]
        pub price: f64,

        #[sea_orm(column_type = "Double")]
        pub fees: f64,

        #[sea_orm(column_type = "Text")]
        pub status: String,

        #[sea_orm(column_type = "Text")]
        pub notes: String,

        #[sea_orm(column_type = "Text")]
        pub platform: String,

        /// Write time as fixed width RFC 3339 UTC text (NULL for legacy rows)
        #[sea_orm(column_type = "Text", nullable)]
        pub timestamp: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}
