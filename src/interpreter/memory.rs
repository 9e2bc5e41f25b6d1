// Wed Jan 15 2026 - Alex

use crate::interpreter::InterpreterError;
use crate::memory::RamImage;

pub const RAM_SEGMENT: u32 = 0x80;
pub const STACK_SEGMENT: u32 = 0x81;
pub const STACK_WORDS: usize = 0x4000;

/// Console address space seen by the interpreter. Segment 0x80 maps the
/// captured RAM read-only (stores are bounds-checked, then dropped); segment
/// 0x81 is a small zeroed scratch stack.
#[derive(Debug, Clone)]
pub struct AddressSpace {
    ram: RamImage,
    stack: Vec<u32>,
}

enum Slot {
    Ram(usize),
    Stack(usize),
}

impl AddressSpace {
    pub fn new(ram: RamImage) -> Self {
        Self {
            ram,
            stack: vec![0; STACK_WORDS],
        }
    }

    pub fn ram(&self) -> &RamImage {
        &self.ram
    }

    fn slot(&self, vaddr: u32) -> Result<Slot, InterpreterError> {
        let index = ((vaddr & 0x00FF_FFFF) / 4) as usize;
        match vaddr >> 24 {
            RAM_SEGMENT if index < self.ram.len() => Ok(Slot::Ram(index)),
            STACK_SEGMENT if index < self.stack.len() => Ok(Slot::Stack(index)),
            RAM_SEGMENT | STACK_SEGMENT => Err(InterpreterError::OutOfBounds(vaddr)),
            _ => Err(InterpreterError::UnmappedSegment(vaddr)),
        }
    }

    /// Word containing `vaddr` (the low two bits are ignored).
    pub fn read_word(&self, vaddr: u32) -> Result<u32, InterpreterError> {
        match self.slot(vaddr)? {
            Slot::Ram(i) => self.ram.get(i).ok_or(InterpreterError::OutOfBounds(vaddr)),
            Slot::Stack(i) => Ok(self.stack[i]),
        }
    }

    fn merge(&mut self, vaddr: u32, value: u32, mask: u32) -> Result<(), InterpreterError> {
        if let Slot::Stack(i) = self.slot(vaddr)? {
            let word = &mut self.stack[i];
            *word = (*word & !mask) | (value & mask);
        }
        Ok(())
    }

    pub fn write_word(&mut self, vaddr: u32, value: u32) -> Result<(), InterpreterError> {
        self.merge(vaddr, value, u32::MAX)
    }

    pub fn write_half(&mut self, vaddr: u32, value: u16) -> Result<(), InterpreterError> {
        let shift = half_shift(vaddr);
        self.merge(vaddr, (value as u32) << shift, 0xFFFF << shift)
    }

    pub fn write_byte(&mut self, vaddr: u32, value: u8) -> Result<(), InterpreterError> {
        let shift = byte_shift(vaddr);
        self.merge(vaddr, (value as u32) << shift, 0xFF << shift)
    }
}

/// Bit position of byte `vaddr & 3` inside its word, most significant first.
pub fn byte_shift(vaddr: u32) -> u32 {
    24 - 8 * (vaddr & 3)
}

pub fn half_shift(vaddr: u32) -> u32 {
    16 - 8 * (vaddr & 2)
}
