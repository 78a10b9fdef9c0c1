use chrono::{Duration, Utc};
use interface::Identity;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    iat: i64,
    exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("token has an empty subject")]
    EmptySubject,

    #[error("token lifetime is out of range")]
    TtlOutOfRange,
}

/// Token lifetime from a whole number of hours, refusing values chrono can't hold.
pub fn ttl_from_hours(hours: i64) -> Result<Duration, TokenError> {
    Duration::try_hours(hours).ok_or(TokenError::TtlOutOfRange)
}

/// Sign an HS256 bearer token for `identity`, valid for `ttl`.
pub fn issue_token(identity: &Identity, secret: &str, ttl: Duration) -> Result<String, TokenError> {
    if identity.uid.is_empty() {
        return Err(TokenError::EmptySubject);
    }

    let now = Utc::now();
    let claims = Claims {
        sub: identity.uid.clone(),
        email: identity.email.clone(),
        name: identity.display_name.clone(),
        iat: now.timestamp(),
        exp: now
            .checked_add_signed(ttl)
            .ok_or(TokenError::TtlOutOfRange)?
            .timestamp(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Check signature and expiry, then return the identity the token was issued for.
pub fn verify_token(token: &str, secret: &str) -> Result<Identity, TokenError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    if data.claims.sub.is_empty() {
        return Err(TokenError::EmptySubject);
    }

    Ok(Identity {
        uid: data.claims.sub,
        email: data.claims.email,
        display_name: data.claims.name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_then_verify() {
        let identity = Identity {
            uid: "alice".to_string(),
            email: Some("alice@example.com".to_string()),
            display_name: Some("Alice".to_string()),
        };

        let token = issue_token(&identity, "secret", Duration::hours(1)).unwrap();
        assert_eq!(verify_token(&token, "secret").unwrap(), identity);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token(&Identity::new("alice"), "secret", Duration::hours(1)).unwrap();
        assert!(matches!(
            verify_token(&token, "other"),
            Err(TokenError::Jwt(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        // well past the default 60s leeway
        let token = issue_token(&Identity::new("alice"), "secret", Duration::hours(-2)).unwrap();
        assert!(verify_token(&token, "secret").is_err());
    }

    #[test]
    fn test_empty_uid_cannot_be_issued() {
        assert!(matches!(
            issue_token(&Identity::new(""), "secret", Duration::hours(1)),
            Err(TokenError::EmptySubject)
        ));
    }

    #[test]
    fn test_oversized_ttl_is_an_error() {
        assert!(matches!(
            ttl_from_hours(i64::MAX),
            Err(TokenError::TtlOutOfRange)
        ));
        assert_eq!(ttl_from_hours(24).unwrap(), Duration::hours(24));

        assert!(matches!(
            issue_token(&Identity::new("alice"), "secret", Duration::MAX),
            Err(TokenError::TtlOutOfRange)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(verify_token("not.a.jwt", "secret").is_err());
    }
}
