// Tue Jan 13 2026 - Alex

pub mod database;
pub mod error;
pub mod mask;
pub mod scanner;
pub mod signature;

pub use database::{call_to, SignatureDatabase};
pub use error::PatternError;
pub use mask::{MaskedPattern, MaskedWord};
pub use scanner::{find_all, find_entries, find_word};
pub use signature::Signature;
