// Wed Jan 15 2026 - Alex

use crate::mips::DecodeError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpreterError {
    #[error("Address {0:#010x} is in an unmapped segment")]
    UnmappedSegment(u32),
    #[error("Address {0:#010x} is past the end of its segment")]
    OutOfBounds(u32),
    #[error("Instruction fetch failed at pc {pc:#010x}")]
    FetchFault { pc: u32 },
    #[error("Division by zero at pc {pc:#010x}")]
    DivideByZero { pc: u32 },
    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),
}
