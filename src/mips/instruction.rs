// Tue Jan 13 2026 - Alex

use super::opcode::{Format, Kind};
use super::register::{CacheOp, Cop0Register, Register};
use std::fmt;

/// One decoded machine word. Which of the optional fields are populated is
/// fixed by `kind.format()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub kind: Kind,
    pub rs: Option<Register>,
    pub rt: Option<Register>,
    pub rd: Option<Register>,
    pub shift: Option<u8>,
    pub imm: Option<i16>,
    /// Branch displacement in bytes, relative to the delay slot.
    pub offset: Option<i32>,
    /// Jump target as a byte address inside the current 256 MiB segment.
    pub target: Option<u32>,
    pub cop0: Option<Cop0Register>,
    pub cache: Option<CacheOp>,
}

impl Instruction {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            rs: None,
            rt: None,
            rd: None,
            shift: None,
            imm: None,
            offset: None,
            target: None,
            cop0: None,
            cache: None,
        }
    }

    pub fn nop() -> Self {
        Self::new(Kind::Nop)
    }

    pub fn with_rs(mut self, rs: Register) -> Self {
        self.rs = Some(rs);
        self
    }

    pub fn with_rt(mut self, rt: Register) -> Self {
        self.rt = Some(rt);
        self
    }

    pub fn with_rd(mut self, rd: Register) -> Self {
        self.rd = Some(rd);
        self
    }

    pub fn with_shift(mut self, shift: u8) -> Self {
        self.shift = Some(shift);
        self
    }

    pub fn with_imm(mut self, imm: i16) -> Self {
        self.imm = Some(imm);
        self
    }

    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_target(mut self, target: u32) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_cop0(mut self, cop0: Cop0Register) -> Self {
        self.cop0 = Some(cop0);
        self
    }

    pub fn with_cache(mut self, cache: CacheOp) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn jal(target: u32) -> Self {
        Self::new(Kind::Jal).with_target(target)
    }

    pub fn jr(rs: Register) -> Self {
        Self::new(Kind::Jr).with_rs(rs)
    }

    pub fn lui(rt: Register, imm: i16) -> Self {
        Self::new(Kind::Lui).with_rt(rt).with_imm(imm)
    }

    pub fn addiu(rt: Register, rs: Register, imm: i16) -> Self {
        Self::new(Kind::Addiu).with_rs(rs).with_rt(rt).with_imm(imm)
    }

    pub fn sw(rt: Register, displacement: i16, base: Register) -> Self {
        Self::new(Kind::Sw).with_rs(base).with_rt(rt).with_imm(displacement)
    }

    pub fn lw(rt: Register, displacement: i16, base: Register) -> Self {
        Self::new(Kind::Lw).with_rs(base).with_rt(rt).with_imm(displacement)
    }

    pub fn format(&self) -> Format {
        self.kind.format()
    }

    /// `addiu sp, sp, -N`, the frame allocation at a function entry.
    pub fn is_stack_prolog(&self) -> bool {
        self.kind == Kind::Addiu
            && self.rs == Some(Register::Sp)
            && self.rt == Some(Register::Sp)
            && self.imm.is_some_and(|imm| imm < 0)
    }

    pub fn imm_unsigned(&self) -> u32 {
        self.imm.map(|imm| imm as u16 as u32).unwrap_or(0)
    }

    pub fn imm_signed(&self) -> u32 {
        self.imm.map(|imm| imm as i32 as u32).unwrap_or(0)
    }
}

impl Default for Instruction {
    fn default() -> Self {
        Self::nop()
    }
}

fn reg(r: Option<Register>) -> &'static str {
    r.map(Register::name).unwrap_or("?")
}

fn hex(value: i64) -> String {
    if value < 0 {
        format!("-{:#x}", -value)
    } else {
        format!("{:#x}", value)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.kind.mnemonic();
        let imm = hex(self.imm.unwrap_or(0) as i64);
        let off = hex(self.offset.unwrap_or(0) as i64);
        match self.format() {
            Format::None => write!(f, "{}", m),
            Format::RegImm => write!(f, "{} {}, {}, {}", m, reg(self.rt), reg(self.rs), imm),
            Format::RegImmT => write!(f, "{} {}, {:#x}", m, reg(self.rt), self.imm_unsigned()),
            Format::Branch2 => write!(f, "{} {}, {}, {}", m, reg(self.rs), reg(self.rt), off),
            Format::Branch1 => write!(f, "{} {}, {}", m, reg(self.rs), off),
            Format::Memory => write!(f, "{} {}, {}({})", m, reg(self.rt), imm, reg(self.rs)),
            Format::Jump => write!(f, "{} {:#010x}", m, 0x8000_0000 | self.target.unwrap_or(0)),
            Format::Cache => {
                let op = self.cache.map(|c| c.to_string()).unwrap_or_default();
                write!(f, "{} {}, {}({})", m, op, imm, reg(self.rs))
            }
            Format::Reg3 => write!(f, "{} {}, {}, {}", m, reg(self.rd), reg(self.rs), reg(self.rt)),
            Format::Reg2 => write!(f, "{} {}, {}", m, reg(self.rs), reg(self.rt)),
            Format::ShiftImm => write!(
                f,
                "{} {}, {}, {}",
                m,
                reg(self.rd),
                reg(self.rt),
                self.shift.unwrap_or(0)
            ),
            Format::RegSD => write!(f, "{} {}, {}", m, reg(self.rd), reg(self.rs)),
            Format::RegS => write!(f, "{} {}", m, reg(self.rs)),
            Format::RegD => write!(f, "{} {}", m, reg(self.rd)),
            Format::Sync => write!(f, "{}", m),
            Format::Cop0 => {
                let sel = self.cop0.map(|c| c.to_string()).unwrap_or_default();
                write!(f, "{} {}, {}", m, reg(self.rt), sel)
            }
        }
    }
}
