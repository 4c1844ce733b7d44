//! Security models
//!
//! - `secret`: Zeroizing holder for key material
mod secret;

pub use secret::SecretString;
