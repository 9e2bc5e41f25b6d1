// Tue Jan 13 2026 - Alex

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod instruction;
pub mod opcode;
pub mod register;

pub use decoder::decode;
pub use encoder::encode;
pub use error::{DecodeError, EncodeError};
pub use instruction::Instruction;
pub use opcode::{Fields, Format, Kind};
pub use register::{CacheOp, Cop0Register, Register};
