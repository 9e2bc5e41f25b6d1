// Tue Jan 13 2026 - Alex

use crate::mips::EncodeError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Pattern is empty")]
    EmptyPattern,
    #[error("Unknown signature: {0}")]
    UnknownSignature(String),
    #[error("Could not build call instruction: {0}")]
    Encode(#[from] EncodeError),
}
