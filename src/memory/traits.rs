// Wed Jan 15 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryRegion, ModuleInfo};

pub type Pid = u32;

/// Read-only access to foreign processes. Backends exist per host OS; tests
/// use an in-memory fake.
pub trait ProcessIntrospection: Send + Sync {
    type Handle: Send;

    fn enumerate_process_ids(&self) -> Result<Vec<Pid>, MemoryError>;

    fn open_for_read(&self, pid: Pid) -> Option<Self::Handle>;

    fn is_alive(&self, handle: &Self::Handle) -> bool;

    fn list_memory_regions(&self, handle: &Self::Handle) -> Result<Vec<MemoryRegion>, MemoryError>;

    fn list_loaded_modules(&self, handle: &Self::Handle) -> Result<Vec<ModuleInfo>, MemoryError>;

    fn read_memory(
        &self,
        handle: &Self::Handle,
        address: Address,
        buf: &mut [u8],
    ) -> Result<(), MemoryError>;

    /// Name of the executable image, used to recognise host programs.
    fn main_module_name(&self, handle: &Self::Handle) -> Option<String> {
        self.list_loaded_modules(handle)
            .ok()
            .and_then(|modules| modules.into_iter().next())
            .map(|m| m.name)
    }

    fn read_u32(&self, handle: &Self::Handle, address: Address) -> Result<u32, MemoryError> {
        let mut buf = [0u8; 4];
        self.read_memory(handle, address, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn read_words(
        &self,
        handle: &Self::Handle,
        address: Address,
        count: usize,
    ) -> Result<Vec<u32>, MemoryError> {
        let mut buf = vec![0u8; count * 4];
        self.read_memory(handle, address, &mut buf)?;
        Ok(buf
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }
}
