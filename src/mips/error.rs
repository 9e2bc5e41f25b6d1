// Tue Jan 13 2026 - Alex

use super::opcode::Kind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unknown opcode {opcode:#04x} in word {word:#010x}")]
    UnknownOpcode { word: u32, opcode: u32 },
    #[error("Unknown special function {funct:#04x} in word {word:#010x}")]
    UnknownFunction { word: u32, funct: u32 },
    #[error("Unknown reg-immediate selector {code:#04x} in word {word:#010x}")]
    UnknownRegImm { word: u32, code: u32 },
    #[error("Unsupported coprocessor-0 operation {code:#04x} in word {word:#010x}")]
    UnknownCop0 { word: u32, code: u32 },
    #[error("Coprocessor-1 instruction {0:#010x} is not modelled")]
    Coprocessor1(u32),
    #[error("Word {0:#010x} has bits set outside the fields of its kind")]
    NonCanonical(u32),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("{kind} requires field {field}")]
    MissingField { kind: Kind, field: &'static str },
    #[error("{kind}: value {value:#x} does not fit field {field}")]
    FieldOutOfRange {
        kind: Kind,
        field: &'static str,
        value: i64,
    },
}
