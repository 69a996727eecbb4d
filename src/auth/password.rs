//! Password hashing

use thiserror::Error;

/// bcrypt work factor used unless configured otherwise
pub const DEFAULT_COST: u32 = 10;

/// bcrypt only reads this many bytes of input; longer passwords are refused
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(#[from] bcrypt::BcryptError);

/// Salted one-way hashing of account passwords
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Fails for passwords longer than [`MAX_PASSWORD_BYTES`]
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        Ok(bcrypt::non_truncating_hash(password, self.cost)?)
    }

    /// Compare a plaintext password against a stored hash.
    /// A malformed hash or an over-long password counts as a mismatch.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::non_truncating_verify(password, hash).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}
