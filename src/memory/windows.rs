// Wed Jan 15 2026 - Alex

use crate::memory::{
    Address, MemoryError, MemoryRegion, ModuleInfo, Pid, ProcessIntrospection, Protection,
};
use std::mem;
use winapi::shared::minwindef::{DWORD, FALSE, HMODULE, LPCVOID, LPVOID, MAX_PATH};
use winapi::um::handleapi::CloseHandle;
use winapi::um::memoryapi::{ReadProcessMemory, VirtualQueryEx};
use winapi::um::processthreadsapi::OpenProcess;
use winapi::um::psapi::{
    EnumProcessModules, EnumProcesses, GetModuleBaseNameA, GetModuleInformation, MODULEINFO,
};
use winapi::um::synchapi::WaitForSingleObject;
use winapi::um::winbase::WAIT_OBJECT_0;
use winapi::um::winnt::{
    HANDLE, MEMORY_BASIC_INFORMATION, PAGE_EXECUTE, PAGE_EXECUTE_READ, PAGE_EXECUTE_READWRITE,
    PAGE_EXECUTE_WRITECOPY, PAGE_GUARD, PAGE_READONLY, PAGE_READWRITE, PAGE_WRITECOPY,
    PROCESS_QUERY_INFORMATION, PROCESS_VM_READ, SYNCHRONIZE,
};

const MAX_PROCESSES: usize = 1024;
const MAX_MODULES: usize = 1024;

/// Owned process handle, closed on drop.
pub struct WinHandle {
    pid: Pid,
    raw: HANDLE,
}

unsafe impl Send for WinHandle {}

impl WinHandle {
    pub fn pid(&self) -> Pid {
        self.pid
    }
}

impl Drop for WinHandle {
    fn drop(&mut self) {
        unsafe {
            CloseHandle(self.raw);
        }
    }
}

fn protection_from_page(protect: DWORD) -> Protection {
    let mut prot = match protect & 0xFF {
        PAGE_READONLY => Protection::READ,
        PAGE_READWRITE => Protection::READ | Protection::WRITE,
        PAGE_WRITECOPY => Protection::READ | Protection::WRITE | Protection::COPY_ON_WRITE,
        PAGE_EXECUTE => Protection::EXECUTE,
        PAGE_EXECUTE_READ => Protection::READ | Protection::EXECUTE,
        PAGE_EXECUTE_READWRITE => Protection::READ | Protection::WRITE | Protection::EXECUTE,
        PAGE_EXECUTE_WRITECOPY => {
            Protection::READ | Protection::WRITE | Protection::EXECUTE | Protection::COPY_ON_WRITE
        }
        _ => Protection::empty(),
    };
    if protect & PAGE_GUARD != 0 {
        prot |= Protection::GUARD;
    }
    prot
}

/// Windows backend over psapi / VirtualQueryEx / ReadProcessMemory.
#[derive(Debug, Clone, Default)]
pub struct WindowsIntrospection;

impl WindowsIntrospection {
    pub fn new() -> Self {
        Self
    }

    fn modules(&self, handle: &WinHandle) -> Vec<HMODULE> {
        let mut modules: Vec<HMODULE> = vec![std::ptr::null_mut(); MAX_MODULES];
        let mut needed: DWORD = 0;
        let ok = unsafe {
            EnumProcessModules(
                handle.raw,
                modules.as_mut_ptr(),
                (modules.len() * mem::size_of::<HMODULE>()) as DWORD,
                &mut needed,
            )
        };
        if ok == 0 {
            return Vec::new();
        }
        let count = (needed as usize / mem::size_of::<HMODULE>()).min(MAX_MODULES);
        modules.truncate(count);
        modules
    }

    fn module_name(&self, handle: &WinHandle, module: HMODULE) -> Option<String> {
        let mut name = vec![0u8; MAX_PATH];
        let len = unsafe {
            GetModuleBaseNameA(handle.raw, module, name.as_mut_ptr() as *mut i8, name.len() as DWORD)
        };
        if len == 0 {
            return None;
        }
        name.truncate(len as usize);
        Some(String::from_utf8_lossy(&name).into_owned())
    }
}

impl ProcessIntrospection for WindowsIntrospection {
    type Handle = WinHandle;

    fn enumerate_process_ids(&self) -> Result<Vec<Pid>, MemoryError> {
        let mut pids: Vec<DWORD> = vec![0; MAX_PROCESSES];
        let mut needed: DWORD = 0;
        let ok = unsafe {
            EnumProcesses(
                pids.as_mut_ptr(),
                (pids.len() * mem::size_of::<DWORD>()) as DWORD,
                &mut needed,
            )
        };
        if ok == 0 {
            return Err(MemoryError::Io(std::io::Error::last_os_error()));
        }
        pids.truncate(needed as usize / mem::size_of::<DWORD>());
        pids.retain(|&pid| pid != 0);
        Ok(pids)
    }

    fn open_for_read(&self, pid: Pid) -> Option<Self::Handle> {
        let raw = unsafe {
            OpenProcess(
                SYNCHRONIZE | PROCESS_QUERY_INFORMATION | PROCESS_VM_READ,
                FALSE,
                pid,
            )
        };
        if raw.is_null() {
            return None;
        }
        Some(WinHandle { pid, raw })
    }

    fn is_alive(&self, handle: &Self::Handle) -> bool {
        unsafe { WaitForSingleObject(handle.raw, 0) != WAIT_OBJECT_0 }
    }

    fn list_memory_regions(&self, handle: &Self::Handle) -> Result<Vec<MemoryRegion>, MemoryError> {
        let mut regions = Vec::new();
        let mut address: usize = 0;
        loop {
            let mut info: MEMORY_BASIC_INFORMATION = unsafe { mem::zeroed() };
            let written = unsafe {
                VirtualQueryEx(
                    handle.raw,
                    address as LPCVOID,
                    &mut info,
                    mem::size_of::<MEMORY_BASIC_INFORMATION>(),
                )
            };
            if written == 0 {
                break;
            }
            let base = info.BaseAddress as usize;
            let next = match base.checked_add(info.RegionSize) {
                Some(next) if next > address => next,
                _ => break,
            };
            regions.push(MemoryRegion::new(
                Address::new(base as u64),
                info.RegionSize as u64,
                protection_from_page(info.Protect),
            ));
            address = next;
        }
        Ok(regions)
    }

    fn list_loaded_modules(&self, handle: &Self::Handle) -> Result<Vec<ModuleInfo>, MemoryError> {
        let mut out = Vec::new();
        for module in self.modules(handle) {
            let Some(name) = self.module_name(handle, module) else {
                continue;
            };
            let mut info: MODULEINFO = unsafe { mem::zeroed() };
            let ok = unsafe {
                GetModuleInformation(
                    handle.raw,
                    module,
                    &mut info,
                    mem::size_of::<MODULEINFO>() as DWORD,
                )
            };
            if ok == 0 {
                continue;
            }
            out.push(ModuleInfo::new(
                name,
                Address::new(info.lpBaseOfDll as u64),
                info.SizeOfImage as u64,
            ));
        }
        Ok(out)
    }

    fn read_memory(
        &self,
        handle: &Self::Handle,
        address: Address,
        buf: &mut [u8],
    ) -> Result<(), MemoryError> {
        let mut read = 0usize;
        let ok = unsafe {
            ReadProcessMemory(
                handle.raw,
                address.as_u64() as LPCVOID,
                buf.as_mut_ptr() as LPVOID,
                buf.len(),
                &mut read,
            )
        };
        if ok == 0 || read != buf.len() {
            return Err(MemoryError::ReadFailed {
                address: address.as_u64(),
                len: buf.len(),
            });
        }
        Ok(())
    }

    fn main_module_name(&self, handle: &Self::Handle) -> Option<String> {
        let first = *self.modules(handle).first()?;
        self.module_name(handle, first)
    }
}
