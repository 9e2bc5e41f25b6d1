// Tue Jan 13 2026 - Alex

use super::error::EncodeError;
use super::instruction::Instruction;
use super::opcode::{Fields, Kind};

const BRANCH_MIN: i32 = -0x20000;
const BRANCH_MAX: i32 = 0x1FFFC;
const JUMP_LIMIT: u32 = 0x1000_0000;

fn required<T>(kind: Kind, field: &'static str, value: Option<T>) -> Result<T, EncodeError> {
    value.ok_or(EncodeError::MissingField { kind, field })
}

fn out_of_range(kind: Kind, field: &'static str, value: i64) -> EncodeError {
    EncodeError::FieldOutOfRange { kind, field, value }
}

/// Composes the machine word for `inst`. Fields outside the kind's format
/// are ignored.
pub fn encode(inst: &Instruction) -> Result<u32, EncodeError> {
    let kind = inst.kind;
    let fields = kind.format().fields();
    let mut word = kind.selector_bits();

    if fields.contains(Fields::RS) {
        word |= required(kind, "rs", inst.rs)?.bits() << 21;
    }
    if fields.contains(Fields::RT) {
        word |= required(kind, "rt", inst.rt)?.bits() << 16;
    }
    if fields.contains(Fields::RD) {
        word |= required(kind, "rd", inst.rd)?.bits() << 11;
    }
    if fields.contains(Fields::SHIFT) {
        let sa = required(kind, "shift", inst.shift)?;
        if sa > 31 {
            return Err(out_of_range(kind, "shift", sa as i64));
        }
        word |= (sa as u32) << 6;
    }
    if fields.contains(Fields::IMM) {
        word |= required(kind, "imm", inst.imm)? as u16 as u32;
    }
    if fields.contains(Fields::OFFSET) {
        let off = required(kind, "offset", inst.offset)?;
        if off % 4 != 0 || !(BRANCH_MIN..=BRANCH_MAX).contains(&off) {
            return Err(out_of_range(kind, "offset", off as i64));
        }
        word |= ((off >> 2) as u32) & 0xFFFF;
    }
    if fields.contains(Fields::TARGET) {
        let target = required(kind, "target", inst.target)?;
        if target % 4 != 0 || target >= JUMP_LIMIT {
            return Err(out_of_range(kind, "target", target as i64));
        }
        word |= target >> 2;
    }
    if fields.contains(Fields::COP0) {
        word |= required(kind, "cop0", inst.cop0)?.bits() << 11;
    }
    if fields.contains(Fields::CACHE) {
        word |= required(kind, "cache", inst.cache)?.bits() << 16;
    }

    Ok(word)
}

impl Instruction {
    pub fn encode(&self) -> Result<u32, EncodeError> {
        encode(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mips::register::{Cop0Register, Register};

    #[test]
    fn test_encode_known_words() {
        assert_eq!(encode(&Instruction::nop()), Ok(0));
        assert_eq!(encode(&Instruction::jr(Register::Ra)), Ok(0x03E0_0008));
        assert_eq!(encode(&Instruction::jal(0x4400)), Ok(0x0C00_1100));
        assert_eq!(
            encode(&Instruction::addiu(Register::Sp, Register::Sp, -0x18)),
            Ok(0x27BD_FFE8)
        );
        let mfc0 = Instruction::new(Kind::Mfc0)
            .with_rt(Register::V0)
            .with_cop0(Cop0Register::COUNT);
        assert_eq!(encode(&mfc0), Ok(0x4002_4800));
    }

    #[test]
    fn test_encode_missing_field() {
        let err = encode(&Instruction::new(Kind::Addiu).with_rt(Register::A0)).unwrap_err();
        assert_eq!(
            err,
            EncodeError::MissingField {
                kind: Kind::Addiu,
                field: "rs"
            }
        );
    }

    #[test]
    fn test_encode_rejects_unaligned_target() {
        assert!(matches!(
            encode(&Instruction::jal(0x4402)),
            Err(EncodeError::FieldOutOfRange { field: "target", .. })
        ));
        let branch = Instruction::new(Kind::Beq)
            .with_rs(Register::Zero)
            .with_rt(Register::Zero)
            .with_offset(0x20000);
        assert!(encode(&branch).is_err());
    }
}
