// Wed Jan 15 2026 - Alex

use crate::memory::{
    Address, MemoryError, MemoryRegion, ModuleInfo, Pid, ProcessIntrospection, Protection,
};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::os::unix::fs::FileExt;
use std::path::Path;

pub struct ProcfsHandle {
    pid: Pid,
    mem: File,
}

impl ProcfsHandle {
    pub fn pid(&self) -> Pid {
        self.pid
    }
}

/// Linux backend over `/proc/<pid>/{comm,maps,mem}`.
#[derive(Debug, Clone, Default)]
pub struct ProcfsIntrospection;

impl ProcfsIntrospection {
    pub fn new() -> Self {
        Self
    }

    fn maps(&self, pid: Pid) -> Result<Vec<MapsEntry>, MemoryError> {
        let text = fs::read_to_string(format!("/proc/{}/maps", pid))?;
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .map(MapsEntry::parse)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MapsEntry {
    start: u64,
    end: u64,
    protection: Protection,
    path: Option<String>,
}

impl MapsEntry {
    fn parse(line: &str) -> Result<Self, MemoryError> {
        let malformed = || MemoryError::MalformedRegion(line.to_string());
        let mut parts = line.split_whitespace();
        let range = parts.next().ok_or_else(malformed)?;
        let perms = parts.next().ok_or_else(malformed)?;
        let (start, end) = range.split_once('-').ok_or_else(malformed)?;
        let start = u64::from_str_radix(start, 16).map_err(|_| malformed())?;
        let end = u64::from_str_radix(end, 16).map_err(|_| malformed())?;
        // offset, dev, inode
        let path = parts.nth(3).map(str::to_string);
        Ok(Self {
            start,
            end,
            protection: Protection::from_maps_perms(perms),
            path,
        })
    }

    fn file_name(&self) -> Option<&str> {
        let path = self.path.as_deref()?;
        if path.starts_with('[') {
            return None;
        }
        Path::new(path).file_name().and_then(|n| n.to_str())
    }
}

fn modules_from_maps(entries: &[MapsEntry]) -> Vec<ModuleInfo> {
    let mut order = Vec::new();
    let mut spans: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for entry in entries {
        let Some(name) = entry.file_name() else {
            continue;
        };
        spans
            .entry(name)
            .and_modify(|(lo, hi)| {
                *lo = (*lo).min(entry.start);
                *hi = (*hi).max(entry.end);
            })
            .or_insert_with(|| {
                order.push(name);
                (entry.start, entry.end)
            });
    }
    order
        .into_iter()
        .filter_map(|name| {
            spans
                .get(name)
                .map(|(lo, hi)| ModuleInfo::new(name, Address::new(*lo), hi - lo))
        })
        .collect()
}

impl ProcessIntrospection for ProcfsIntrospection {
    type Handle = ProcfsHandle;

    fn enumerate_process_ids(&self) -> Result<Vec<Pid>, MemoryError> {
        let mut pids = Vec::new();
        for entry in fs::read_dir("/proc")? {
            let entry = entry?;
            if let Some(pid) = entry.file_name().to_str().and_then(|s| s.parse::<Pid>().ok()) {
                pids.push(pid);
            }
        }
        pids.sort_unstable();
        Ok(pids)
    }

    fn open_for_read(&self, pid: Pid) -> Option<Self::Handle> {
        let mem = File::open(format!("/proc/{}/mem", pid)).ok()?;
        Some(ProcfsHandle { pid, mem })
    }

    fn is_alive(&self, handle: &Self::Handle) -> bool {
        let ret = unsafe { libc::kill(handle.pid as libc::pid_t, 0) };
        if ret == 0 {
            return true;
        }
        std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
    }

    fn list_memory_regions(&self, handle: &Self::Handle) -> Result<Vec<MemoryRegion>, MemoryError> {
        Ok(self
            .maps(handle.pid)?
            .into_iter()
            .map(|e| {
                let region = MemoryRegion::new(Address::new(e.start), e.end - e.start, e.protection);
                match e.path {
                    Some(path) => region.with_name(path),
                    None => region,
                }
            })
            .collect())
    }

    fn list_loaded_modules(&self, handle: &Self::Handle) -> Result<Vec<ModuleInfo>, MemoryError> {
        Ok(modules_from_maps(&self.maps(handle.pid)?))
    }

    fn read_memory(
        &self,
        handle: &Self::Handle,
        address: Address,
        buf: &mut [u8],
    ) -> Result<(), MemoryError> {
        handle
            .mem
            .read_exact_at(buf, address.as_u64())
            .map_err(|_| MemoryError::ReadFailed {
                address: address.as_u64(),
                len: buf.len(),
            })
    }

    fn main_module_name(&self, handle: &Self::Handle) -> Option<String> {
        fs::read_to_string(format!("/proc/{}/comm", handle.pid))
            .ok()
            .map(|s| s.trim_end().to_string())
    }
}
