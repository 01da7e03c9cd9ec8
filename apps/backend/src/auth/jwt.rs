use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Registered claims carried by access tokens.
///
/// `sub` is kept as raw JSON: tokens from other issuers may carry the
/// customer id as a string or as a number.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    #[serde(default)]
    pub jti: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<serde_json::Value>,
    /// Issued-at (seconds since epoch)
    #[serde(default)]
    pub iat: i64,
    /// Not-before (seconds since epoch)
    #[serde(default)]
    pub nbf: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Mint an access token for `customer_id`.
///
/// `ttl` defaults to the configured expiration. The subject is written as a
/// decimal string.
pub fn mint_access_token(
    customer_id: i64,
    ttl: Option<Duration>,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time"))?
        .as_secs() as i64;
    let ttl = ttl.unwrap_or(security.default_expiration);

    let claims = Claims {
        jti: Uuid::new_v4().to_string(),
        sub: Some(serde_json::Value::String(customer_id.to_string())),
        iat,
        nbf: iat,
        exp: iat + ttl.as_secs() as i64,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        security.encoding_key()?,
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify signature, `exp` and `nbf`, and return the claims.
pub fn verify_access_token(token: &str, security: &SecurityConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::new(security.algorithm);
    validation.validate_nbf = true;

    decode::<Claims>(token, security.decoding_key(), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::unauthorized("Token has expired"),
            ErrorKind::ImmatureSignature => AppError::unauthorized("Token is not valid yet"),
            ErrorKind::InvalidSignature => AppError::unauthorized("Invalid token signature"),
            _ => AppError::unauthorized("Invalid or malformed token"),
        })
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use jsonwebtoken::{encode, EncodingKey, Header};

    use super::*;

    fn security() -> SecurityConfig {
        SecurityConfig::hmac("test_secret_key_for_testing_purposes_only")
    }

    #[test]
    fn test_mint_and_verify_roundtrip() {
        let security = security();
        let now = SystemTime::now();

        let token = mint_access_token(42, None, now, &security).unwrap();
        let claims = verify_access_token(&token, &security).unwrap();

        assert_eq!(claims.sub, Some(serde_json::json!("42")));
        assert_eq!(
            claims.iat,
            now.duration_since(UNIX_EPOCH).unwrap().as_secs() as i64
        );
        assert_eq!(claims.nbf, claims.iat);
        assert_eq!(claims.exp, claims.iat + 15 * 60);
        assert!(Uuid::parse_str(&claims.jti).is_ok());
    }

    #[test]
    fn test_explicit_ttl() {
        let security = security();
        let token =
            mint_access_token(1, Some(Duration::from_secs(90)), SystemTime::now(), &security)
                .unwrap();
        let claims = verify_access_token(&token, &security).unwrap();
        assert_eq!(claims.exp - claims.iat, 90);
    }

    #[test]
    fn test_each_token_gets_a_fresh_id() {
        let security = security();
        let now = SystemTime::now();
        let a = verify_access_token(&mint_access_token(1, None, now, &security).unwrap(), &security)
            .unwrap();
        let b = verify_access_token(&mint_access_token(1, None, now, &security).unwrap(), &security)
            .unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_expired_token() {
        let security = security();
        // 20 minutes ago so a 15-minute token is expired
        let now = SystemTime::now() - Duration::from_secs(20 * 60);

        let token = mint_access_token(7, None, now, &security).unwrap();
        let err = verify_access_token(&token, &security).unwrap_err();
        assert_eq!(err.public_message(), "Token has expired");
    }

    #[test]
    fn test_not_yet_valid_token() {
        let security = security();
        let now = SystemTime::now() + Duration::from_secs(10 * 60);

        let token = mint_access_token(7, None, now, &security).unwrap();
        let err = verify_access_token(&token, &security).unwrap_err();
        assert_eq!(err.public_message(), "Token is not valid yet");
    }

    #[test]
    fn test_bad_signature() {
        let token = mint_access_token(
            9,
            None,
            SystemTime::now(),
            &SecurityConfig::hmac("secret-A"),
        )
        .unwrap();
        let err = verify_access_token(&token, &SecurityConfig::hmac("secret-B")).unwrap_err();
        assert_eq!(err.public_message(), "Invalid token signature");
    }

    #[test]
    fn test_garbage_token() {
        let err = verify_access_token("not.a.jwt", &security()).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[test]
    fn test_numeric_subject_is_accepted() {
        let iat = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        let token = encode(
            &Header::default(),
            &serde_json::json!({"sub": 1234, "iat": iat, "exp": iat + 60}),
            &EncodingKey::from_secret(b"test_secret_key_for_testing_purposes_only"),
        )
        .unwrap();

        let claims = verify_access_token(&token, &security()).unwrap();
        assert_eq!(claims.sub, Some(serde_json::json!(1234)));
        assert_eq!(claims.jti, "");
    }
}
