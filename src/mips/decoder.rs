// Tue Jan 13 2026 - Alex

use super::encoder::encode;
use super::error::DecodeError;
use super::instruction::Instruction;
use super::opcode::{Fields, Kind, OP_COP0, OP_COP1, OP_REGIMM, OP_SPECIAL};
use super::register::{CacheOp, Cop0Register, Register};

fn classify(word: u32) -> Result<Kind, DecodeError> {
    let opcode = word >> 26;
    match opcode {
        OP_SPECIAL => {
            let funct = word & 0x3F;
            Kind::from_special(funct).ok_or(DecodeError::UnknownFunction { word, funct })
        }
        OP_REGIMM => {
            let code = (word >> 16) & 0x1F;
            Kind::from_regimm(code).ok_or(DecodeError::UnknownRegImm { word, code })
        }
        OP_COP0 => {
            let code = (word >> 21) & 0x1F;
            Kind::from_cop0(code).ok_or(DecodeError::UnknownCop0 { word, code })
        }
        OP_COP1 => Err(DecodeError::Coprocessor1(word)),
        _ => Kind::from_opcode(opcode).ok_or(DecodeError::UnknownOpcode { word, opcode }),
    }
}

fn populate(kind: Kind, word: u32) -> Instruction {
    let fields = kind.format().fields();
    let mut inst = Instruction::new(kind);

    if fields.contains(Fields::RS) {
        inst.rs = Some(Register::from_index(word >> 21));
    }
    if fields.contains(Fields::RT) {
        inst.rt = Some(Register::from_index(word >> 16));
    }
    if fields.contains(Fields::RD) {
        inst.rd = Some(Register::from_index(word >> 11));
    }
    if fields.contains(Fields::SHIFT) {
        inst.shift = Some(((word >> 6) & 0x1F) as u8);
    }
    if fields.contains(Fields::IMM) {
        inst.imm = Some(word as u16 as i16);
    }
    if fields.contains(Fields::OFFSET) {
        inst.offset = Some((word as u16 as i16 as i32) << 2);
    }
    if fields.contains(Fields::TARGET) {
        inst.target = Some((word & 0x03FF_FFFF) << 2);
    }
    if fields.contains(Fields::COP0) {
        inst.cop0 = Some(Cop0Register::new(word >> 11));
    }
    if fields.contains(Fields::CACHE) {
        inst.cache = Some(CacheOp::new(word >> 16));
    }

    inst
}

/// Decodes one machine word. Zero is the canonical `nop`; any word carrying
/// bits outside the fields of its kind is rejected.
pub fn decode(word: u32) -> Result<Instruction, DecodeError> {
    if word == 0 {
        return Ok(Instruction::nop());
    }

    let inst = populate(classify(word)?, word);
    match encode(&inst) {
        Ok(encoded) if encoded == word => Ok(inst),
        _ => Err(DecodeError::NonCanonical(word)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_zero_is_nop() {
        assert_eq!(decode(0), Ok(Instruction::nop()));
        assert_eq!(Instruction::nop().encode(), Ok(0));
    }

    #[test]
    fn test_decode_fields() {
        let i = decode(0x27BD_FFE8).unwrap();
        assert_eq!(i.kind, Kind::Addiu);
        assert_eq!(i.rs, Some(Register::Sp));
        assert_eq!(i.imm, Some(-0x18));
        assert!(i.is_stack_prolog());

        let b = decode(0x1420_FFFD).unwrap();
        assert_eq!(b.kind, Kind::Bne);
        assert_eq!(b.rs, Some(Register::At));
        assert_eq!(b.offset, Some(-12));

        let c = decode(0xBD19_0000).unwrap();
        assert_eq!(c.kind, Kind::Cache);
        assert_eq!(c.rs, Some(Register::T0));
        assert_eq!(c.cache, Some(CacheOp::new(0x19)));

        let m = decode(0x4089_6000).unwrap();
        assert_eq!(m.kind, Kind::Mtc0);
        assert_eq!(m.rt, Some(Register::T1));
        assert_eq!(m.cop0, Some(Cop0Register::STATUS));

        let j = decode(0x0C00_1100).unwrap();
        assert_eq!(j.kind, Kind::Jal);
        assert_eq!(j.target, Some(0x4400));
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode(0x4600_0000), Err(DecodeError::Coprocessor1(0x4600_0000)));
        assert!(matches!(decode(0x4800_0000), Err(DecodeError::UnknownOpcode { opcode: 0x12, .. })));
        assert!(matches!(decode(0x0000_0001), Err(DecodeError::UnknownFunction { funct: 1, .. })));
        assert!(matches!(decode(0x0404_0000), Err(DecodeError::UnknownRegImm { code: 4, .. })));
        assert!(matches!(decode(0x4040_0000), Err(DecodeError::UnknownCop0 { code: 2, .. })));
        // jr ra with a stray rd
        assert_eq!(decode(0x03E0_0808), Err(DecodeError::NonCanonical(0x03E0_0808)));
    }

    #[test]
    fn test_round_trip_constructed() {
        let samples = [
            Instruction::lui(Register::Gp, -0x7FF0),
            Instruction::sw(Register::Ra, 0x24, Register::Sp),
            Instruction::lw(Register::T0, -4, Register::A0),
            Instruction::jal(0x0FFF_FFFC),
            Instruction::new(Kind::Bgezal).with_rs(Register::S0).with_offset(-0x20000),
            Instruction::new(Kind::Beql)
                .with_rs(Register::A0)
                .with_rt(Register::A1)
                .with_offset(0x1FFFC),
            Instruction::new(Kind::Sra)
                .with_rt(Register::T1)
                .with_rd(Register::T2)
                .with_shift(31),
            Instruction::new(Kind::Jalr).with_rs(Register::T9).with_rd(Register::Ra),
            Instruction::new(Kind::Mflo).with_rd(Register::V0),
            Instruction::new(Kind::Divu).with_rs(Register::A0).with_rt(Register::A1),
            Instruction::new(Kind::Nor)
                .with_rs(Register::T0)
                .with_rt(Register::T1)
                .with_rd(Register::T2),
            Instruction::new(Kind::Sync).with_shift(0),
            Instruction::new(Kind::Mfc0)
                .with_rt(Register::T0)
                .with_cop0(Cop0Register::CAUSE),
            Instruction::new(Kind::Cache)
                .with_rs(Register::T0)
                .with_cache(CacheOp::new(0x15))
                .with_imm(0x10),
        ];
        for inst in samples {
            let word = inst.encode().unwrap();
            assert_eq!(decode(word), Ok(inst), "{:#010x}", word);
        }
    }

    #[test]
    fn test_round_trip_words() {
        let mut seed = 0x1234_5678u32;
        let mut accepted = 0;
        for _ in 0..20_000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            if let Ok(inst) = decode(seed) {
                assert_eq!(inst.encode(), Ok(seed));
                accepted += 1;
            }
        }
        assert!(accepted > 0);
    }
}
