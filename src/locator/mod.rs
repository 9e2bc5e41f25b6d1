// Wed Jan 15 2026 - Alex

pub mod error;
pub mod ram_locator;
pub mod magic;
pub mod strategy;

pub use error::LocatorError;
pub use ram_locator::{Attachment, RamLocator};
pub use magic::MagicProbe;
pub use strategy::{ModuleScan, RamLocationStrategy, RegionScan};
