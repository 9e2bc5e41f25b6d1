// Wed Jan 15 2026 - Alex

use crate::interpreter::{Interpreter, InterpreterError};
use crate::memory::RamImage;
use crate::mips::{Kind, Register};
use log::trace;
use std::collections::BTreeSet;

pub const KSEG0_BASE: u32 = 0x8000_0000;

/// Bounded run over the instructions leading up to a call site, the call
/// itself and its delay slot.
#[derive(Debug, Clone)]
pub struct CallProbe {
    lead: usize,
    seeds: Vec<(Register, u32)>,
}

/// Machine state after a probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    registers: [u32; 32],
    stored_words: BTreeSet<u32>,
}

impl ProbeOutcome {
    pub fn register(&self, reg: Register) -> u32 {
        self.registers[reg.index()]
    }

    /// Nonzero values written by `sw` during the run, whether or not the
    /// store landed.
    pub fn stored_words(&self) -> &BTreeSet<u32> {
        &self.stored_words
    }

    pub fn into_stored_words(self) -> BTreeSet<u32> {
        self.stored_words
    }
}

impl CallProbe {
    pub fn new(lead: usize) -> Self {
        Self {
            lead,
            seeds: Vec::new(),
        }
    }

    pub fn with_seed(mut self, reg: Register, value: u32) -> Self {
        self.seeds.push((reg, value));
        self
    }

    pub fn steps(&self) -> usize {
        self.lead + 2
    }

    /// Runs the probe ending at the delay slot of the call at word `call_site`.
    pub fn run(&self, image: &RamImage, call_site: usize) -> Result<ProbeOutcome, InterpreterError> {
        let call_vaddr = KSEG0_BASE | ((call_site as u32) << 2);
        let start = call_vaddr.wrapping_sub((self.lead as u32) << 2);

        let mut machine = Interpreter::new(image.clone()).with_pc(start);
        for &(reg, value) in &self.seeds {
            machine.set(reg, value);
        }

        let mut stored_words = BTreeSet::new();
        for _ in 0..self.steps() {
            let Some(inst) = machine.step()? else {
                continue;
            };
            if inst.kind == Kind::Sw {
                let value = inst.rt.map(|r| machine.get(r)).unwrap_or(0);
                if value != 0 {
                    stored_words.insert(value);
                }
            }
        }

        trace!(
            "probe at {:#x}: a0={:08x} a1={:08x} a2={:08x}, {} stores",
            call_site,
            machine.get(Register::A0),
            machine.get(Register::A1),
            machine.get(Register::A2),
            stored_words.len()
        );

        Ok(ProbeOutcome {
            registers: *machine.registers(),
            stored_words,
        })
    }

    /// Value of `reg` after the run.
    pub fn argument(
        &self,
        image: &RamImage,
        call_site: usize,
        reg: Register,
    ) -> Result<u32, InterpreterError> {
        Ok(self.run(image, call_site)?.register(reg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mips::Instruction;

    fn enc(inst: Instruction) -> u32 {
        inst.encode().unwrap()
    }

    #[test]
    fn test_second_argument() {
        let mut words = vec![0u32; 64];
        words[30] = enc(Instruction::lui(Register::A1, -0x7FE0));
        words[31] = enc(Instruction::addiu(Register::A1, Register::A1, 0x100));
        words[32] = enc(Instruction::jal(0x400));
        let image = RamImage::from_words(words);
        let probe = CallProbe::new(16);
        assert_eq!(probe.argument(&image, 32, Register::A1), Ok(0x8020_0100));
    }

    #[test]
    fn test_stored_words_with_seed() {
        let mut words = vec![0u32; 64];
        words[40] = enc(Instruction::addiu(Register::A2, Register::Gp, 0x10));
        words[41] = enc(Instruction::sw(Register::A2, 0, Register::Gp));
        words[42] = enc(Instruction::sw(Register::Zero, 4, Register::Gp));
        words[43] = enc(Instruction::jal(0x400));
        let image = RamImage::from_words(words);
        let out = CallProbe::new(20)
            .with_seed(Register::Gp, 0x8000_0100)
            .run(&image, 43)
            .unwrap();
        assert_eq!(out.register(Register::A2), 0x8000_0110);
        assert_eq!(out.stored_words().iter().copied().collect::<Vec<_>>(), vec![0x8000_0110]);
    }

    #[test]
    fn test_probe_before_ram_start_fails() {
        let image = RamImage::from_words(vec![0u32; 8]);
        assert!(matches!(
            CallProbe::new(16).run(&image, 2),
            Err(InterpreterError::FetchFault { .. })
        ));
    }
}
