// Wed Jan 15 2026 - Alex

use crate::memory::{
    Address, MemoryError, MemoryRegion, ModuleInfo, Pid, ProcessIntrospection, Protection,
};
use parking_lot::Mutex;
use std::sync::Arc;

struct FakeMapping {
    region: MemoryRegion,
    bytes: Vec<u8>,
}

struct FakeProcess {
    pid: Pid,
    name: String,
    alive: bool,
    mappings: Vec<FakeMapping>,
    modules: Vec<ModuleInfo>,
}

/// In-memory process table. Clones share state so a test can mutate a
/// process while a worker thread holds another clone.
#[derive(Clone, Default)]
pub struct FakeIntrospection {
    processes: Arc<Mutex<Vec<FakeProcess>>>,
}

impl FakeIntrospection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&self, pid: Pid, name: &str) {
        self.processes.lock().push(FakeProcess {
            pid,
            name: name.to_string(),
            alive: true,
            mappings: Vec::new(),
            modules: Vec::new(),
        });
    }

    pub fn map(&self, pid: Pid, base: u64, protection: Protection, bytes: Vec<u8>) {
        self.with_process(pid, |p| {
            let region = MemoryRegion::new(Address::new(base), bytes.len() as u64, protection);
            p.mappings.push(FakeMapping { region, bytes });
            p.mappings.sort_by_key(|m| m.region.base());
        });
    }

    pub fn map_words(&self, pid: Pid, base: u64, protection: Protection, words: &[u32]) {
        let bytes = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        self.map(pid, base, protection, bytes);
    }

    pub fn add_module(&self, pid: Pid, name: &str, base: u64, size: u64) {
        self.with_process(pid, |p| {
            p.modules.push(ModuleInfo::new(name, Address::new(base), size));
        });
    }

    pub fn write_u32(&self, pid: Pid, address: u64, value: u32) {
        self.with_process(pid, |p| {
            for m in &mut p.mappings {
                let base = m.region.base().as_u64();
                if address >= base && address + 4 <= base + m.region.size() {
                    let at = (address - base) as usize;
                    m.bytes[at..at + 4].copy_from_slice(&value.to_le_bytes());
                }
            }
        });
    }

    /// Drops every mapping starting at `base`.
    pub fn unmap(&self, pid: Pid, base: u64) {
        self.with_process(pid, |p| {
            p.mappings.retain(|m| m.region.base().as_u64() != base);
        });
    }

    pub fn kill(&self, pid: Pid) {
        self.with_process(pid, |p| p.alive = false);
    }

    fn with_process<R>(&self, pid: Pid, f: impl FnOnce(&mut FakeProcess) -> R) -> Option<R> {
        let mut processes = self.processes.lock();
        processes.iter_mut().find(|p| p.pid == pid).map(f)
    }
}

impl ProcessIntrospection for FakeIntrospection {
    type Handle = Pid;

    fn enumerate_process_ids(&self) -> Result<Vec<Pid>, MemoryError> {
        Ok(self
            .processes
            .lock()
            .iter()
            .filter(|p| p.alive)
            .map(|p| p.pid)
            .collect())
    }

    fn open_for_read(&self, pid: Pid) -> Option<Self::Handle> {
        self.with_process(pid, |p| p.alive).unwrap_or(false).then_some(pid)
    }

    fn is_alive(&self, handle: &Self::Handle) -> bool {
        self.with_process(*handle, |p| p.alive).unwrap_or(false)
    }

    fn list_memory_regions(&self, handle: &Self::Handle) -> Result<Vec<MemoryRegion>, MemoryError> {
        self.with_process(*handle, |p| p.mappings.iter().map(|m| m.region.clone()).collect())
            .ok_or(MemoryError::ProcessGone(*handle))
    }

    fn list_loaded_modules(&self, handle: &Self::Handle) -> Result<Vec<ModuleInfo>, MemoryError> {
        self.with_process(*handle, |p| p.modules.clone())
            .ok_or(MemoryError::ProcessGone(*handle))
    }

    fn read_memory(
        &self,
        handle: &Self::Handle,
        address: Address,
        buf: &mut [u8],
    ) -> Result<(), MemoryError> {
        let failed = MemoryError::ReadFailed {
            address: address.as_u64(),
            len: buf.len(),
        };
        let found = self.with_process(*handle, |p| {
            if !p.alive {
                return false;
            }
            let start = address.as_u64();
            let end = start + buf.len() as u64;
            for m in &p.mappings {
                let base = m.region.base().as_u64();
                if m.region.is_readable() && start >= base && end <= base + m.region.size() {
                    let at = (start - base) as usize;
                    buf.copy_from_slice(&m.bytes[at..at + buf.len()]);
                    return true;
                }
            }
            false
        });
        match found {
            Some(true) => Ok(()),
            _ => Err(failed),
        }
    }

    fn main_module_name(&self, handle: &Self::Handle) -> Option<String> {
        self.with_process(*handle, |p| p.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_reads_only_readable_mappings() {
        let fake = FakeIntrospection::new();
        fake.spawn(7, "project64.exe");
        fake.map_words(7, 0x1000, Protection::READ | Protection::WRITE, &[0xAABBCCDD, 2]);
        fake.map_words(7, 0x9000, Protection::empty(), &[3]);

        let h = fake.open_for_read(7).unwrap();
        assert_eq!(fake.read_u32(&h, Address::new(0x1000)).unwrap(), 0xAABBCCDD);
        assert_eq!(fake.read_words(&h, Address::new(0x1000), 2).unwrap(), vec![0xAABBCCDD, 2]);
        assert!(fake.read_u32(&h, Address::new(0x9000)).is_err());
        assert!(fake.read_u32(&h, Address::new(0x1006)).is_err());

        fake.write_u32(7, 0x1004, 9);
        assert_eq!(fake.read_u32(&h, Address::new(0x1004)).unwrap(), 9);

        fake.unmap(7, 0x9000);
        assert_eq!(fake.list_memory_regions(&h).unwrap().len(), 1);
        assert_eq!(fake.read_u32(&h, Address::new(0x1004)).unwrap(), 9);

        fake.kill(7);
        assert!(!fake.is_alive(&h));
        assert!(fake.open_for_read(7).is_none());
    }
}
