// Tue Jan 13 2026 - Alex

use crate::mips::Instruction;
use crate::pattern::{MaskedPattern, PatternError, Signature};
use once_cell::sync::Lazy;

pub const OS_GET_COUNT: &str = "osGetCount";
pub const OS_DISABLE_INT: &str = "__osDisableInt";
pub const OS_RESTORE_INT: &str = "__osRestoreInt";
pub const OS_WRITEBACK_DCACHE: &str = "osWritebackDCache";
pub const OS_INVAL_DCACHE: &str = "osInvalDCache";
pub const GP_SETUP: &str = "gpSetup";

const GET_COUNT: &[u32] = &[
    0x4002_4800, // mfc0 v0, Count
    0x03E0_0008, // jr ra
    0x0000_0000,
];

const DISABLE_INT: &[(u32, u32)] = &[
    (0x4000_6000, 0x001F_0000), // mfc0 __, Status
    (0x2400_FFFE, 0x001F_0000), // addiu __, zero, -2
    (0x0000_0024, 0x03FF_F800), // and __, __, __
    (0x4080_6000, 0x001F_0000), // mtc0 __, Status
    (0x3002_0001, 0x03E0_0000), // andi v0, __, 1
];

const RESTORE_INT: &[(u32, u32)] = &[
    (0x4000_6000, 0x001F_0000), // mfc0 __, Status
    (0x0004_0025, 0x03E0_F800), // or __, __, a0
    (0x4080_6000, 0x001F_0000), // mtc0 __, Status
    (0x0000_0000, 0),
    (0x0000_0000, 0),
    (0x03E0_0008, 0), // jr ra
    (0x0000_0000, 0),
];

// Tail shared by both data-cache routines: the whole-cache loop taken for
// large ranges.
const DCACHE_INDEX_LOOP: &[(u32, u32)] = &[
    (0x3C00_8000, 0x001F_0000), // lui __, 0x8000
    (0x0000_0021, 0x03FF_F800), // addu __, __, __
    (0x2400_FFF0, 0x03FF_0000), // addiu __, __, -0x10
    (0xBC01_0000, 0x03E0_0000), // cache (D, 0), 0(__)
    (0x0000_002B, 0x03FF_F800), // sltu __, __, __
    (0x1400_FFFD, 0x03E0_0000), // bne __, zero, -0xc
    (0x2400_0010, 0x03FF_0000), // addiu __, __, 0x10
    (0x03E0_0008, 0),
    (0x0000_0000, 0),
];

const WRITEBACK_DCACHE_HEAD: &[(u32, u32)] = &[
    (0x0000_0023, 0x03FF_F800), // subu __, __, __
    (0xBC19_0000, 0x03E0_0000), // cache (D, 6), 0(__)
    (0x0000_002B, 0x03FF_F800),
    (0x1400_FFFD, 0x03E0_0000),
    (0x2400_0010, 0x03FF_0000),
    (0x03E0_0008, 0),
    (0x0000_0000, 0),
];

const INVAL_DCACHE_HEAD: &[(u32, u32)] = &[
    (0x0000_0023, 0x03FF_F800), // subu __, __, __
    (0xBC15_0000, 0x03E0_0000), // cache (D, 5), 0(__)
    (0x0000_002B, 0x03FF_F800),
    (0x1000_000E, 0x03E0_0000), // beq __, zero, 0x38
    (0x0000_0000, 0),
    (0x2400_0010, 0x03FF_0000),
    (0x3000_000F, 0x03FF_0000), // andi __, __, 0xf
    (0x1000_0006, 0x03E0_0000), // beq __, zero, 0x18
    (0x0000_0000, 0),
    (0x0000_0023, 0x03FF_F800),
    (0xBC15_0010, 0x03E0_0000), // cache (D, 5), 0x10(__)
    (0x0000_002B, 0x03FF_F800),
    (0x1400_0005, 0x03E0_0000),
    (0x0000_0000, 0),
    (0xBC11_0000, 0x03E0_0000), // cache (D, 4), 0(__)
    (0x0000_002B, 0x03FF_F800),
    (0x1400_FFFD, 0x03E0_0000),
    (0x2400_0010, 0x03FF_0000),
    (0x03E0_0008, 0),
    (0x0000_0000, 0),
];

const GP_SETUP_WORDS: &[(u32, u32)] = &[
    (0x3C1C_0000, 0x0000_FFFF), // lui gp, hi
    (0x03E0_0008, 0),
    (0x279C_0000, 0x0000_FFFF), // addiu gp, gp, lo
];

fn joined(parts: &[&[(u32, u32)]]) -> MaskedPattern {
    let pairs: Vec<(u32, u32)> = parts.iter().flat_map(|p| p.iter().copied()).collect();
    MaskedPattern::from_pairs(&pairs)
}

/// Signatures of the console OS routines the locator anchors on.
#[derive(Debug, Clone)]
pub struct SignatureDatabase {
    signatures: Vec<Signature>,
}

static BUILTIN: Lazy<SignatureDatabase> = Lazy::new(SignatureDatabase::new);

impl SignatureDatabase {
    pub fn new() -> Self {
        let signatures = vec![
            Signature::new(OS_GET_COUNT, MaskedPattern::literal(GET_COUNT)),
            // Some builds keep a few setup words ahead of the body.
            Signature::new(OS_DISABLE_INT, MaskedPattern::from_pairs(DISABLE_INT))
                .with_entry_offsets(&[0, -4]),
            Signature::new(OS_RESTORE_INT, MaskedPattern::from_pairs(RESTORE_INT)),
            Signature::new(
                OS_WRITEBACK_DCACHE,
                joined(&[WRITEBACK_DCACHE_HEAD, DCACHE_INDEX_LOOP]),
            )
            .with_entry_offsets(&[-0xd]),
            // An extra nop is sometimes scheduled before the body.
            Signature::new(OS_INVAL_DCACHE, joined(&[INVAL_DCACHE_HEAD, DCACHE_INDEX_LOOP]))
                .with_entry_offsets(&[-0xe, -0xf]),
            Signature::new(GP_SETUP, MaskedPattern::from_pairs(GP_SETUP_WORDS)),
        ];
        Self { signatures }
    }

    pub fn builtin() -> &'static SignatureDatabase {
        &BUILTIN
    }

    pub fn get(&self, name: &str) -> Result<&Signature, PatternError> {
        self.signatures
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| PatternError::UnknownSignature(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signature> {
        self.signatures.iter()
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

impl Default for SignatureDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// The `jal` word whose target is RAM word `word_offset`.
pub fn call_to(word_offset: usize) -> Result<u32, PatternError> {
    let target = u32::try_from(word_offset)
        .ok()
        .and_then(|w| w.checked_mul(4))
        .unwrap_or(u32::MAX);
    Ok(Instruction::jal(target).encode()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lengths() {
        let db = SignatureDatabase::builtin();
        assert_eq!(db.len(), 6);
        assert_eq!(db.get(OS_DISABLE_INT).unwrap().pattern().len(), 5);
        assert_eq!(db.get(OS_RESTORE_INT).unwrap().pattern().len(), 7);
        assert_eq!(db.get(OS_WRITEBACK_DCACHE).unwrap().pattern().len(), 16);
        assert_eq!(db.get(OS_INVAL_DCACHE).unwrap().pattern().len(), 29);
        assert!(db.get(OS_GET_COUNT).unwrap().pattern().is_literal());
        assert!(matches!(db.get("nope"), Err(PatternError::UnknownSignature(_))));
    }

    #[test]
    fn test_call_to() {
        assert_eq!(call_to(0x1100), Ok(0x0C00_1100));
        assert_eq!(call_to(0), Ok(0x0C00_0000));
        assert!(call_to(0x0400_0000).is_err());
    }
}
