// Wed Jan 15 2026 - Alex

use crate::memory::MemoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("No strategy configured for host {0}")]
    UnknownHost(String),

    #[error("Host {host} uses module scan but names no module")]
    MissingModuleFilter { host: String },
}
