// Wed Jan 15 2026 - Alex

use crate::config::Config;
use crate::memory::{Address, ProcessIntrospection};
use log::trace;

/// Recognises the first instruction of the console's RAM initialisation code
/// at the start of the RAM mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagicProbe {
    value: u32,
    mask: u32,
    offset: u64,
}

impl MagicProbe {
    pub const VALUE: u32 = 0x3C1A_8000;
    pub const MASK: u32 = 0xFFFF_F000;

    pub fn new(value: u32, mask: u32) -> Self {
        Self {
            value,
            mask,
            offset: 0,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.magic_value, config.magic_mask)
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn matches(&self, word: u32) -> bool {
        word & self.mask == self.value
    }

    /// Reads one word at `base` plus the probe offset. Unreadable addresses
    /// never match.
    pub fn test<P: ProcessIntrospection>(
        &self,
        introspection: &P,
        handle: &P::Handle,
        base: Address,
    ) -> bool {
        let Some(at) = base.checked_add(self.offset) else {
            return false;
        };
        match introspection.read_u32(handle, at) {
            Ok(word) => self.matches(word),
            Err(e) => {
                trace!("magic probe at {}: {}", at, e);
                false
            }
        }
    }
}

impl Default for MagicProbe {
    fn default() -> Self {
        Self::new(Self::VALUE, Self::MASK)
    }
}
