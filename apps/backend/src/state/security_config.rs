use std::fmt;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};

use crate::config::JwtConfig;
use crate::error::AppError;

/// Key material and defaults for issuing and verifying access tokens.
#[derive(Clone)]
pub struct SecurityConfig {
    pub algorithm: Algorithm,
    /// Lifetime of tokens minted without an explicit TTL.
    pub default_expiration: Duration,
    decoding_key: DecodingKey,
    /// Absent on deployments that only verify tokens.
    encoding_key: Option<EncodingKey>,
}

impl SecurityConfig {
    /// Build keys from configuration. Asymmetric algorithms expect PEM text,
    /// HS* algorithms use the configured value as the shared secret.
    pub fn from_config(config: &JwtConfig) -> Result<Self, AppError> {
        let decoding_key = decoding_key(config.algorithm, &config.public_key)?;
        let encoding_key = config
            .private_key
            .as_deref()
            .map(|key| encoding_key(config.algorithm, key))
            .transpose()?;

        Ok(Self {
            algorithm: config.algorithm,
            default_expiration: config.default_expiration,
            decoding_key,
            encoding_key,
        })
    }

    /// HS256 config over a shared secret.
    pub fn hmac(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();
        Self {
            algorithm: Algorithm::HS256,
            default_expiration: Duration::from_secs(15 * 60),
            decoding_key: DecodingKey::from_secret(secret),
            encoding_key: Some(EncodingKey::from_secret(secret)),
        }
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    pub fn encoding_key(&self) -> Result<&EncodingKey, AppError> {
        self.encoding_key
            .as_ref()
            .ok_or_else(|| AppError::config("JWT_PRIVATE_KEY is required to issue tokens"))
    }

    pub fn can_sign(&self) -> bool {
        self.encoding_key.is_some()
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("algorithm", &self.algorithm)
            .field("default_expiration", &self.default_expiration)
            .field("can_sign", &self.can_sign())
            .finish()
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::hmac(b"default_secret_for_tests_only")
    }
}

fn decoding_key(algorithm: Algorithm, key: &str) -> Result<DecodingKey, AppError> {
    let bytes = key.as_bytes();
    let parsed = match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            return Ok(DecodingKey::from_secret(bytes))
        }
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => DecodingKey::from_rsa_pem(bytes),
        Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(bytes),
        Algorithm::EdDSA => DecodingKey::from_ed_pem(bytes),
    };
    parsed.map_err(|e| AppError::config(format!("JWT_PUBLIC_KEY is not a valid {algorithm:?} key: {e}")))
}

fn encoding_key(algorithm: Algorithm, key: &str) -> Result<EncodingKey, AppError> {
    let bytes = key.as_bytes();
    let parsed = match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            return Ok(EncodingKey::from_secret(bytes))
        }
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => EncodingKey::from_rsa_pem(bytes),
        Algorithm::ES256 | Algorithm::ES384 => EncodingKey::from_ec_pem(bytes),
        Algorithm::EdDSA => EncodingKey::from_ed_pem(bytes),
    };
    parsed.map_err(|e| AppError::config(format!("JWT_PRIVATE_KEY is not a valid {algorithm:?} key: {e}")))
}
