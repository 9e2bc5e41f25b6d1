// Tue Jan 13 2026 - Alex

pub mod address;
pub mod error;
pub mod protection;
pub mod region;
pub mod snapshot;
pub mod traits;

#[cfg(target_os = "linux")]
pub mod procfs;
#[cfg(windows)]
pub mod windows;
#[cfg(test)]
pub mod fake;

pub use address::Address;
pub use error::MemoryError;
pub use protection::Protection;
pub use region::{MemoryRegion, ModuleInfo};
pub use snapshot::{RamImage, RAM_BYTES, RAM_WORDS};
pub use traits::{Pid, ProcessIntrospection};

#[cfg(target_os = "linux")]
pub use procfs::ProcfsIntrospection as NativeIntrospection;
#[cfg(windows)]
pub use windows::WindowsIntrospection as NativeIntrospection;
