// Wed Jan 15 2026 - Alex

//! Hand-assembled RAM image containing the OS routines the analyzer anchors
//! on, wired together the way libultra lays them out.

use crate::memory::{RamImage, RAM_WORDS};
use crate::mips::{Instruction, Register};

pub const MAGIC: u32 = 0x3C1A_8000;

pub const GET_COUNT: usize = 0x1000;
pub const DISABLE_INT: usize = 0x1010;
pub const RESTORE_INT: usize = 0x1020;
pub const WRITEBACK: usize = 0x1040;
pub const INVAL: usize = 0x1080;
pub const GP_SETUP: usize = 0x10C0;
pub const GET_TIME: usize = 0x1100;
pub const DMA_START: usize = 0x1200;
pub const VIRT_TO_PHYS: usize = 0x1300;
pub const CONT_INIT: usize = 0x1400;
pub const CALLER: usize = 0x1500;
/// The `jal osContInit` inside the caller.
pub const CALLER_SITE: usize = CALLER + 20;

pub const GP_VALUE: u32 = 0x800F_8010;
pub const STATUS_ADDRESS: u32 = 0x8010_0000;
pub const PADS_OFFSET: u32 = 0x10_0010;
pub const INPUT_WORD: usize = (PADS_OFFSET / 4) as usize;

const JR_RA: u32 = 0x03E0_0008;
const NOP: u32 = 0;

fn jal(word: usize) -> u32 {
    0x0C00_0000 | word as u32
}

fn enc(inst: Instruction) -> u32 {
    inst.encode().unwrap()
}

fn frame(size: i16) -> [u32; 2] {
    [
        enc(Instruction::addiu(Register::Sp, Register::Sp, -size)),
        enc(Instruction::sw(Register::Ra, size - 4, Register::Sp)),
    ]
}

fn epilogue(size: i16) -> [u32; 4] {
    [
        enc(Instruction::lw(Register::Ra, size - 4, Register::Sp)),
        enc(Instruction::addiu(Register::Sp, Register::Sp, size)),
        JR_RA,
        NOP,
    ]
}

pub struct Fixture {
    words: Vec<u32>,
}

impl Fixture {
    pub fn new() -> Self {
        let mut f = Self {
            words: vec![0; RAM_WORDS],
        };
        f.set(0, MAGIC);

        f.put(GET_COUNT, &[0x4002_4800, JR_RA, NOP]);
        f.put(
            DISABLE_INT,
            &[0x4008_6000, 0x2401_FFFE, 0x0101_4824, 0x4089_6000, 0x3102_0001],
        );
        f.put(
            RESTORE_INT,
            &[0x4008_6000, 0x0104_4025, 0x4088_6000, NOP, NOP, JR_RA, NOP],
        );

        f.put(
            WRITEBACK + 0xd,
            &[
                0x010A_4023, 0xBD19_0000, 0x0109_082B, 0x1420_FFFD, 0x2508_0010, JR_RA, NOP,
                0x3C08_8000, 0x010B_4821, 0x2529_FFF0, 0xBD01_0000, 0x0109_082B, 0x1420_FFFD,
                0x2508_0010, JR_RA, NOP,
            ],
        );
        f.put(
            INVAL + 0xe,
            &[
                0x010A_4023, 0xBD15_0000, 0x0109_082B, 0x1020_000E, NOP, 0x2508_0010, 0x312A_000F,
                0x1140_0006, NOP, 0x012A_4823, 0xBD35_0010, 0x0128_082B, 0x1420_0005, NOP,
                0xBD11_0000, 0x0109_082B, 0x1420_FFFD, 0x2508_0010, JR_RA, NOP, 0x3C08_8000,
                0x010B_4821, 0x2529_FFF0, 0xBD01_0000, 0x0109_082B, 0x1420_FFFD, 0x2508_0010,
                JR_RA, NOP,
            ],
        );
        f.put(GP_SETUP, &[0x3C1C_8010, JR_RA, 0x279C_8010]);

        let mut get_time = frame(0x18).to_vec();
        get_time.extend([jal(DISABLE_INT), NOP, jal(GET_COUNT), NOP, jal(RESTORE_INT), NOP]);
        get_time.extend(epilogue(0x18));
        f.put(GET_TIME, &get_time);

        let mut dma = frame(0x20).to_vec();
        dma.extend([jal(WRITEBACK), NOP, jal(VIRT_TO_PHYS), NOP, jal(INVAL), NOP]);
        dma.extend(epilogue(0x20));
        f.put(DMA_START, &dma);
        f.put(VIRT_TO_PHYS, &[JR_RA, NOP]);

        let mut cont_init = frame(0x40).to_vec();
        cont_init.extend([
            jal(GET_TIME),
            NOP,
            0x3C05_8020, // lui a1, 0x8020
            0x24A5_0100, // addiu a1, a1, 0x100
            0x2404_0001, // addiu a0, zero, 1
            jal(DMA_START),
            NOP,
            0x3C05_8020,
            0x24A5_0100,
            jal(DMA_START),
            0x2404_0000, // addiu a0, zero, 0
        ]);
        cont_init.extend(epilogue(0x40));
        f.put(CONT_INIT, &cont_init);

        let mut caller = frame(0x28).to_vec();
        caller.extend([
            0x2786_7FF0, // addiu a2, gp, 0x7ff0
            0xAF86_0010, // sw a2, 0x10(gp)
            0x24CF_0010, // addiu t7, a2, 0x10
            0xAF8F_0014, // sw t7, 0x14(gp)
            0x3C18_8025, // lui t8, 0x8025
            0xAF98_0018, // sw t8, 0x18(gp)
            0x3C04_8030, // lui a0, 0x8030
            0x2484_0100, // addiu a0, a0, 0x100
            0x2785_0020, // addiu a1, gp, 0x20
        ]);
        caller.resize(CALLER_SITE - CALLER, NOP);
        caller.extend([jal(CONT_INIT), NOP]);
        caller.extend(epilogue(0x28));
        f.put(CALLER, &caller);

        f
    }

    pub fn set(&mut self, index: usize, word: u32) {
        self.words[index] = word;
    }

    pub fn put(&mut self, index: usize, words: &[u32]) {
        self.words[index..index + words.len()].copy_from_slice(words);
    }

    pub fn with_input(mut self, value: u32) -> Self {
        self.set(INPUT_WORD, value);
        self
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn image(&self) -> RamImage {
        RamImage::from_words(self.words.clone())
    }

    /// RAM as the emulator process holds it in memory.
    pub fn le_bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::database::{self, SignatureDatabase};
    use crate::pattern::find_all;

    #[test]
    fn test_each_signature_matches_once() {
        let f = Fixture::new();
        let db = SignatureDatabase::builtin();
        let expect = [
            (database::OS_GET_COUNT, GET_COUNT),
            (database::OS_DISABLE_INT, DISABLE_INT),
            (database::OS_RESTORE_INT, RESTORE_INT),
            (database::OS_WRITEBACK_DCACHE, WRITEBACK + 0xd),
            (database::OS_INVAL_DCACHE, INVAL + 0xe),
            (database::GP_SETUP, GP_SETUP),
        ];
        for (name, at) in expect {
            let found = find_all(f.words(), db.get(name).unwrap().pattern());
            assert_eq!(found, vec![at], "{}", name);
        }
    }

    #[test]
    fn test_layout() {
        let f = Fixture::new();
        assert_eq!(f.words()[CALLER_SITE], jal(CONT_INIT));
        assert_eq!(f.words()[CONT_INIT + 2], jal(GET_TIME));
        assert_eq!(f.words()[CONT_INIT + 7], jal(DMA_START));
        assert_eq!(f.words()[CONT_INIT + 11], jal(DMA_START));
        assert_eq!(f.words()[GET_TIME], 0x27BD_FFE8);
    }
}
