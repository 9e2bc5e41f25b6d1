// Tue Jan 13 2026 - Alex

use bitflags::bitflags;
use std::fmt;

pub const OP_SPECIAL: u32 = 0x00;
pub const OP_REGIMM: u32 = 0x01;
pub const OP_COP0: u32 = 0x10;
pub const OP_COP1: u32 = 0x11;

pub const COP_MF: u32 = 0x00;
pub const COP_MT: u32 = 0x04;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Nop,

    Addi,
    Addiu,
    Andi,
    Beq,
    Beql,
    Bgtz,
    Bgtzl,
    Blez,
    Blezl,
    Bne,
    Bnel,
    Cache,
    Daddi,
    Daddiu,
    J,
    Jal,
    Lb,
    Lbu,
    Ld,
    Ldl,
    Ldr,
    Lh,
    Lhu,
    Ll,
    Lld,
    Lui,
    Lw,
    Lwl,
    Lwr,
    Lwu,
    Ori,
    Sb,
    Sc,
    Scd,
    Sd,
    Sdl,
    Sdr,
    Sh,
    Slti,
    Sltiu,
    Sw,
    Swl,
    Swr,
    Xori,

    Add,
    Addu,
    And,
    Dadd,
    Daddu,
    Ddiv,
    Ddivu,
    Div,
    Divu,
    Dmult,
    Dmultu,
    Dsll,
    Dsll32,
    Dsllv,
    Dsra,
    Dsra32,
    Dsrav,
    Dsrl,
    Dsrl32,
    Dsrlv,
    Dsub,
    Dsubu,
    Jalr,
    Jr,
    Mfhi,
    Mflo,
    Mthi,
    Mtlo,
    Mult,
    Multu,
    Nor,
    Or,
    Sll,
    Sllv,
    Slt,
    Sltu,
    Sra,
    Srav,
    Srl,
    Srlv,
    Sub,
    Subu,
    Sync,
    Xor,

    Bgez,
    Bgezal,
    Bgezall,
    Bgezl,
    Bltz,
    Bltzal,
    Bltzall,
    Bltzl,

    Mfc0,
    Mtc0,
}

/// Which decode table a kind lives in, with its selector value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Nop,
    Immediate(u32),
    Special(u32),
    RegImm(u32),
    Cop0(u32),
}

const IMMEDIATE: &[(u32, Kind)] = &[
    (0x02, Kind::J),
    (0x03, Kind::Jal),
    (0x04, Kind::Beq),
    (0x05, Kind::Bne),
    (0x06, Kind::Blez),
    (0x07, Kind::Bgtz),
    (0x08, Kind::Addi),
    (0x09, Kind::Addiu),
    (0x0A, Kind::Slti),
    (0x0B, Kind::Sltiu),
    (0x0C, Kind::Andi),
    (0x0D, Kind::Ori),
    (0x0E, Kind::Xori),
    (0x0F, Kind::Lui),
    (0x14, Kind::Beql),
    (0x15, Kind::Bnel),
    (0x16, Kind::Blezl),
    (0x17, Kind::Bgtzl),
    (0x18, Kind::Daddi),
    (0x19, Kind::Daddiu),
    (0x1A, Kind::Ldl),
    (0x1B, Kind::Ldr),
    (0x20, Kind::Lb),
    (0x21, Kind::Lh),
    (0x22, Kind::Lwl),
    (0x23, Kind::Lw),
    (0x24, Kind::Lbu),
    (0x25, Kind::Lhu),
    (0x26, Kind::Lwr),
    (0x27, Kind::Lwu),
    (0x28, Kind::Sb),
    (0x29, Kind::Sh),
    (0x2A, Kind::Swl),
    (0x2B, Kind::Sw),
    (0x2C, Kind::Sdl),
    (0x2D, Kind::Sdr),
    (0x2E, Kind::Swr),
    (0x2F, Kind::Cache),
    (0x30, Kind::Ll),
    (0x34, Kind::Lld),
    (0x37, Kind::Ld),
    (0x38, Kind::Sc),
    (0x3C, Kind::Scd),
    (0x3F, Kind::Sd),
];

const SPECIAL: &[(u32, Kind)] = &[
    (0x00, Kind::Sll),
    (0x02, Kind::Srl),
    (0x03, Kind::Sra),
    (0x04, Kind::Sllv),
    (0x06, Kind::Srlv),
    (0x07, Kind::Srav),
    (0x08, Kind::Jr),
    (0x09, Kind::Jalr),
    (0x0F, Kind::Sync),
    (0x10, Kind::Mfhi),
    (0x11, Kind::Mthi),
    (0x12, Kind::Mflo),
    (0x13, Kind::Mtlo),
    (0x14, Kind::Dsllv),
    (0x16, Kind::Dsrlv),
    (0x17, Kind::Dsrav),
    (0x18, Kind::Mult),
    (0x19, Kind::Multu),
    (0x1A, Kind::Div),
    (0x1B, Kind::Divu),
    (0x1C, Kind::Dmult),
    (0x1D, Kind::Dmultu),
    (0x1E, Kind::Ddiv),
    (0x1F, Kind::Ddivu),
    (0x20, Kind::Add),
    (0x21, Kind::Addu),
    (0x22, Kind::Sub),
    (0x23, Kind::Subu),
    (0x24, Kind::And),
    (0x25, Kind::Or),
    (0x26, Kind::Xor),
    (0x27, Kind::Nor),
    (0x2A, Kind::Slt),
    (0x2B, Kind::Sltu),
    (0x2C, Kind::Dadd),
    (0x2D, Kind::Daddu),
    (0x2E, Kind::Dsub),
    (0x2F, Kind::Dsubu),
    (0x38, Kind::Dsll),
    (0x3A, Kind::Dsrl),
    (0x3B, Kind::Dsra),
    (0x3C, Kind::Dsll32),
    (0x3E, Kind::Dsrl32),
    (0x3F, Kind::Dsra32),
];

const REGIMM: &[(u32, Kind)] = &[
    (0x00, Kind::Bltz),
    (0x01, Kind::Bgez),
    (0x02, Kind::Bltzl),
    (0x03, Kind::Bgezl),
    (0x10, Kind::Bltzal),
    (0x11, Kind::Bgezal),
    (0x12, Kind::Bltzall),
    (0x13, Kind::Bgezall),
];

const COP0: &[(u32, Kind)] = &[(COP_MF, Kind::Mfc0), (COP_MT, Kind::Mtc0)];

fn lookup(table: &[(u32, Kind)], code: u32) -> Option<Kind> {
    table.iter().find(|(c, _)| *c == code).map(|(_, k)| *k)
}

fn reverse(table: &[(u32, Kind)], kind: Kind) -> Option<u32> {
    table.iter().find(|(_, k)| *k == kind).map(|(c, _)| *c)
}

impl Kind {
    pub fn from_opcode(opcode: u32) -> Option<Self> {
        lookup(IMMEDIATE, opcode)
    }

    pub fn from_special(funct: u32) -> Option<Self> {
        lookup(SPECIAL, funct)
    }

    pub fn from_regimm(code: u32) -> Option<Self> {
        lookup(REGIMM, code)
    }

    pub fn from_cop0(code: u32) -> Option<Self> {
        lookup(COP0, code)
    }

    pub fn family(self) -> Family {
        if self == Kind::Nop {
            return Family::Nop;
        }
        if let Some(code) = reverse(IMMEDIATE, self) {
            return Family::Immediate(code);
        }
        if let Some(code) = reverse(SPECIAL, self) {
            return Family::Special(code);
        }
        if let Some(code) = reverse(REGIMM, self) {
            return Family::RegImm(code);
        }
        match reverse(COP0, self) {
            Some(code) => Family::Cop0(code),
            None => Family::Nop,
        }
    }

    /// Opcode/function bits of the kind with every operand field cleared.
    pub fn selector_bits(self) -> u32 {
        match self.family() {
            Family::Nop => 0,
            Family::Immediate(op) => op << 26,
            Family::Special(funct) => (OP_SPECIAL << 26) | funct,
            Family::RegImm(code) => (OP_REGIMM << 26) | (code << 16),
            Family::Cop0(code) => (OP_COP0 << 26) | (code << 21),
        }
    }

    pub fn format(self) -> Format {
        use Kind::*;
        match self {
            Nop => Format::None,

            Addi | Addiu | Andi | Daddi | Daddiu | Ori | Slti | Sltiu | Xori => Format::RegImm,
            Lui => Format::RegImmT,
            Beq | Beql | Bne | Bnel => Format::Branch2,
            Bgtz | Bgtzl | Blez | Blezl => Format::Branch1,
            Bgez | Bgezal | Bgezall | Bgezl | Bltz | Bltzal | Bltzall | Bltzl => Format::Branch1,
            Lb | Lbu | Ld | Ldl | Ldr | Lh | Lhu | Ll | Lld | Lw | Lwl | Lwr | Lwu => Format::Memory,
            Sb | Sc | Scd | Sd | Sdl | Sdr | Sh | Sw | Swl | Swr => Format::Memory,
            J | Jal => Format::Jump,
            Cache => Format::Cache,

            Add | Addu | And | Dadd | Daddu | Dsllv | Dsrav | Dsrlv | Dsub | Dsubu | Nor | Or
            | Sllv | Slt | Sltu | Srav | Srlv | Sub | Subu | Xor => Format::Reg3,
            Ddiv | Ddivu | Div | Divu | Dmult | Dmultu | Mult | Multu => Format::Reg2,
            Dsll | Dsll32 | Dsra | Dsra32 | Dsrl | Dsrl32 | Sll | Sra | Srl => Format::ShiftImm,
            Jalr => Format::RegSD,
            Jr | Mthi | Mtlo => Format::RegS,
            Mfhi | Mflo => Format::RegD,
            Sync => Format::Sync,

            Mfc0 | Mtc0 => Format::Cop0,
        }
    }

    pub fn mnemonic(self) -> String {
        format!("{:?}", self).to_lowercase()
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Fields: u16 {
        const RS = 1 << 0;
        const RT = 1 << 1;
        const RD = 1 << 2;
        const SHIFT = 1 << 3;
        const IMM = 1 << 4;
        const OFFSET = 1 << 5;
        const TARGET = 1 << 6;
        const COP0 = 1 << 7;
        const CACHE = 1 << 8;
    }
}

/// Operand layout shared by a group of kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    None,
    RegImm,
    RegImmT,
    Branch2,
    Branch1,
    Memory,
    Jump,
    Cache,
    Reg3,
    Reg2,
    ShiftImm,
    RegSD,
    RegS,
    RegD,
    Sync,
    Cop0,
}

impl Format {
    pub fn fields(self) -> Fields {
        match self {
            Format::None => Fields::empty(),
            Format::RegImm => Fields::RS | Fields::RT | Fields::IMM,
            Format::RegImmT => Fields::RT | Fields::IMM,
            Format::Branch2 => Fields::RS | Fields::RT | Fields::OFFSET,
            Format::Branch1 => Fields::RS | Fields::OFFSET,
            Format::Memory => Fields::RS | Fields::RT | Fields::IMM,
            Format::Jump => Fields::TARGET,
            Format::Cache => Fields::RS | Fields::CACHE | Fields::IMM,
            Format::Reg3 => Fields::RS | Fields::RT | Fields::RD,
            Format::Reg2 => Fields::RS | Fields::RT,
            Format::ShiftImm => Fields::RT | Fields::RD | Fields::SHIFT,
            Format::RegSD => Fields::RS | Fields::RD,
            Format::RegS => Fields::RS,
            Format::RegD => Fields::RD,
            Format::Sync => Fields::SHIFT,
            Format::Cop0 => Fields::RT | Fields::COP0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_have_no_duplicate_kinds() {
        for table in [IMMEDIATE, SPECIAL, REGIMM, COP0] {
            for (i, (code, kind)) in table.iter().enumerate() {
                assert!(table[i + 1..].iter().all(|(c, k)| c != code && k != kind));
            }
        }
    }

    #[test]
    fn test_selector_bits() {
        assert_eq!(Kind::Jal.selector_bits(), 0x0C00_0000);
        assert_eq!(Kind::Jr.selector_bits(), 0x0000_0008);
        assert_eq!(Kind::Bgezal.selector_bits(), 0x0411_0000);
        assert_eq!(Kind::Mtc0.selector_bits(), 0x4080_0000);
        assert_eq!(Kind::Nop.selector_bits(), 0);
    }

    #[test]
    fn test_formats() {
        assert_eq!(Kind::Sw.format(), Format::Memory);
        assert_eq!(Kind::Lui.format().fields(), Fields::RT | Fields::IMM);
        assert_eq!(Kind::Beq.format(), Format::Branch2);
        assert_eq!(Kind::Addiu.mnemonic(), "addiu");
    }
}
