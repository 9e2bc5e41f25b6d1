// Tue Jan 13 2026 - Alex

use crate::memory::{Address, Protection};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRegion {
    base: Address,
    size: u64,
    protection: Protection,
    name: String,
}

impl MemoryRegion {
    pub fn new(base: Address, size: u64, protection: Protection) -> Self {
        Self {
            base,
            size,
            protection,
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn base(&self) -> Address {
        self.base
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn end(&self) -> Address {
        self.base + self.size
    }

    pub fn protection(&self) -> Protection {
        self.protection
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contains(&self, addr: Address) -> bool {
        addr >= self.base && addr < self.end()
    }

    pub fn is_readable(&self) -> bool {
        self.protection.can_read()
    }
}

impl fmt::Display for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} {} {}", self.base, self.end(), self.protection, self.name)
    }
}

/// A module (executable image or shared library) mapped into a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub name: String,
    pub base: Address,
    pub size: u64,
}

impl ModuleInfo {
    pub fn new(name: impl Into<String>, base: Address, size: u64) -> Self {
        Self {
            name: name.into(),
            base,
            size,
        }
    }

    pub fn end(&self) -> Address {
        self.base + self.size
    }

    pub fn name_lowercase(&self) -> String {
        self.name.to_lowercase()
    }
}

impl fmt::Display for ModuleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {} (+{:#x})", self.name, self.base, self.size)
    }
}
