#![allow(dead_code)]

// tests/common/mod.rs
use std::time::{Duration, SystemTime};

use actix_web::http::header;
use skeleton_api::{mint_access_token, AppState, SecurityConfig};

// Logging is auto-installed for most test binaries
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

pub const TEST_SECRET: &str = "test_secret_key_for_testing_purposes_only";

pub fn test_security() -> SecurityConfig {
    SecurityConfig::hmac(TEST_SECRET)
}

/// State with HMAC keys and no database.
pub fn test_state() -> AppState {
    AppState::without_db(test_security())
}

/// Fresh token for `customer_id` signed with [`TEST_SECRET`].
pub fn token_for(customer_id: i64) -> String {
    mint_access_token(customer_id, None, SystemTime::now(), &test_security())
        .expect("mint test token")
}

/// Token whose expiry is well past the validation leeway.
pub fn expired_token_for(customer_id: i64) -> String {
    mint_access_token(
        customer_id,
        Some(Duration::from_secs(60)),
        SystemTime::now() - Duration::from_secs(30 * 60),
        &test_security(),
    )
    .expect("mint expired token")
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}
