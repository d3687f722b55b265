//! Password hashing and token signing

pub mod jwt;
pub mod password;

pub use jwt::{Clock, JwtConfig, SystemClock, TokenClaims, TokenService};
pub use password::{hash_password, verify_password};
