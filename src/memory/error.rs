// Tue Jan 13 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Read of {len} bytes failed at address {address:#x}")]
    ReadFailed { address: u64, len: usize },
    #[error("Process {0} is gone")]
    ProcessGone(u32),
    #[error("Image of {0} bytes is not a whole number of words")]
    InvalidImageSize(usize),
    #[error("Malformed region entry: {0}")]
    MalformedRegion(String),
}
