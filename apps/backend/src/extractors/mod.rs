pub mod auth_claims;
pub mod bound_query;

pub use auth_claims::{AuthClaims, CustomerId};
pub use bound_query::BoundQuery;
