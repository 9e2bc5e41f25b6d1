// Wed Jan 15 2026 - Alex

use crate::memory::{Address, MemoryError, ProcessIntrospection};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Words of console main memory (4 MiB).
pub const RAM_WORDS: usize = 0x10_0000;
pub const RAM_BYTES: usize = RAM_WORDS * 4;

/// Captured console RAM, addressed by word index. Cloning shares the buffer.
#[derive(Debug, Clone)]
pub struct RamImage {
    words: Arc<[u32]>,
}

impl RamImage {
    pub fn from_words(words: Vec<u32>) -> Self {
        Self {
            words: words.into(),
        }
    }

    /// Host-order (little-endian) bytes as the emulator keeps them.
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self, MemoryError> {
        if bytes.len() % 4 != 0 {
            return Err(MemoryError::InvalidImageSize(bytes.len()));
        }
        let words = bytes
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect::<Vec<_>>();
        Ok(Self::from_words(words))
    }

    /// Loads a raw RAM dump from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MemoryError> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file) }?;
        Self::from_le_bytes(&mmap)
    }

    /// Reads `words` words of RAM starting at `base` in one request.
    pub fn capture<P: ProcessIntrospection>(
        introspection: &P,
        handle: &P::Handle,
        base: Address,
        words: usize,
    ) -> Result<Self, MemoryError> {
        let words = introspection.read_words(handle, base, words)?;
        Ok(Self::from_words(words))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        self.words.get(index).copied()
    }

    pub fn window(&self, start: usize, len: usize) -> Option<&[u32]> {
        self.words.get(start..start.checked_add(len)?)
    }
}

/// True for a KSEG0 address whose RAM offset lies within `ram_bytes`.
pub fn is_ram_vaddr(vaddr: u32, ram_bytes: u32) -> bool {
    vaddr >> 24 == 0x80 && (vaddr & 0x00FF_FFFF) <= ram_bytes
}
