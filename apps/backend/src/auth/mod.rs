//! Access tokens and the identity they carry.

pub mod identity;
pub mod jwt;
