//! Password hashing utilities

pub use bcrypt::DEFAULT_COST;

/// Lower bound accepted by bcrypt itself (bcrypt does not export it).
pub const MIN_COST: u32 = 4;

/// Upper bound accepted by bcrypt itself.
pub const MAX_COST: u32 = 31;

/// Hash a password using bcrypt with a fresh random salt
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, hash)
}
