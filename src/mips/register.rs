// Tue Jan 13 2026 - Alex

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Register {
    Zero = 0,
    At,
    V0,
    V1,
    A0,
    A1,
    A2,
    A3,
    T0,
    T1,
    T2,
    T3,
    T4,
    T5,
    T6,
    T7,
    S0,
    S1,
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
    T8,
    T9,
    K0,
    K1,
    Gp,
    Sp,
    Fp,
    Ra,
}

impl Register {
    pub const ALL: [Register; 32] = [
        Self::Zero, Self::At, Self::V0, Self::V1,
        Self::A0, Self::A1, Self::A2, Self::A3,
        Self::T0, Self::T1, Self::T2, Self::T3,
        Self::T4, Self::T5, Self::T6, Self::T7,
        Self::S0, Self::S1, Self::S2, Self::S3,
        Self::S4, Self::S5, Self::S6, Self::S7,
        Self::T8, Self::T9, Self::K0, Self::K1,
        Self::Gp, Self::Sp, Self::Fp, Self::Ra,
    ];

    /// Only the low five bits are significant.
    pub fn from_index(index: u32) -> Self {
        Self::ALL[(index & 0x1F) as usize]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn bits(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        const NAMES: [&str; 32] = [
            "zero", "at", "v0", "v1", "a0", "a1", "a2", "a3",
            "t0", "t1", "t2", "t3", "t4", "t5", "t6", "t7",
            "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7",
            "t8", "t9", "k0", "k1", "gp", "sp", "fp", "ra",
        ];
        NAMES[self.index()]
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Coprocessor-0 register selector (the `rd` slot of MFC0/MTC0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cop0Register(u8);

impl Cop0Register {
    pub const INDEX: Self = Self(0);
    pub const COUNT: Self = Self(9);
    pub const COMPARE: Self = Self(11);
    pub const STATUS: Self = Self(12);
    pub const CAUSE: Self = Self(13);
    pub const EPC: Self = Self(14);

    pub fn new(index: u32) -> Self {
        Self((index & 0x1F) as u8)
    }

    pub fn bits(self) -> u32 {
        self.0 as u32
    }

    pub fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("Index"),
            9 => Some("Count"),
            11 => Some("Compare"),
            12 => Some("Status"),
            13 => Some("Cause"),
            14 => Some("EPC"),
            _ => None,
        }
    }
}

impl fmt::Display for Cop0Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "${}", self.0),
        }
    }
}

/// CACHE operation selector: bits 0-1 pick the cache, bits 2-4 the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheOp(u8);

impl CacheOp {
    pub fn new(bits: u32) -> Self {
        Self((bits & 0x1F) as u8)
    }

    pub fn bits(self) -> u32 {
        self.0 as u32
    }

    pub fn is_data_cache(self) -> bool {
        self.0 & 0b11 == 0b01
    }

    pub fn operation(self) -> u8 {
        self.0 >> 2
    }
}

impl fmt::Display for CacheOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = match self.0 & 0b11 {
            0 => "I",
            1 => "D",
            2 => "SI",
            _ => "SD",
        };
        write!(f, "({}, {})", cache, self.operation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_round_trip() {
        for (i, reg) in Register::ALL.iter().enumerate() {
            assert_eq!(reg.index(), i);
            assert_eq!(Register::from_index(i as u32), *reg);
        }
        assert_eq!(Register::Gp.index(), 28);
        assert_eq!(Register::Sp.name(), "sp");
    }

    #[test]
    fn test_cache_op_fields() {
        let op = CacheOp::new(0x19);
        assert!(op.is_data_cache());
        assert_eq!(op.operation(), 6);
        assert_eq!(Cop0Register::new(12), Cop0Register::STATUS);
        assert_eq!(Cop0Register::STATUS.to_string(), "Status");
    }
}
