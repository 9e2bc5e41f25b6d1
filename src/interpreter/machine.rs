// Wed Jan 15 2026 - Alex

use crate::interpreter::memory::{byte_shift, half_shift};
use crate::interpreter::{AddressSpace, InterpreterError};
use crate::memory::RamImage;
use crate::mips::{decode, Instruction, Kind, Register};
use log::trace;

/// Straight-line R4300 subset. Control flow is never followed: every step
/// advances `pc` by one word.
#[derive(Debug, Clone)]
pub struct Interpreter {
    gpr: [u32; 32],
    hi: u32,
    lo: u32,
    pc: u32,
    memory: AddressSpace,
}

impl Interpreter {
    pub fn new(ram: RamImage) -> Self {
        Self {
            gpr: [0; 32],
            hi: 0,
            lo: 0,
            pc: 0,
            memory: AddressSpace::new(ram),
        }
    }

    pub fn with_pc(mut self, pc: u32) -> Self {
        self.pc = pc;
        self
    }

    pub fn with_register(mut self, reg: Register, value: u32) -> Self {
        self.set(reg, value);
        self
    }

    pub fn pc(&self) -> u32 {
        self.pc
    }

    pub fn hi(&self) -> u32 {
        self.hi
    }

    pub fn lo(&self) -> u32 {
        self.lo
    }

    pub fn get(&self, reg: Register) -> u32 {
        self.gpr[reg.index()]
    }

    pub fn set(&mut self, reg: Register, value: u32) {
        if reg != Register::Zero {
            self.gpr[reg.index()] = value;
        }
    }

    pub fn registers(&self) -> &[u32; 32] {
        &self.gpr
    }

    pub fn memory(&self) -> &AddressSpace {
        &self.memory
    }

    /// Reads the word at `pc` and advances. `Ok(None)` means the word does not
    /// decode; a failed read is fatal to the run.
    pub fn fetch(&mut self) -> Result<Option<Instruction>, InterpreterError> {
        let pc = self.pc;
        let word = self
            .memory
            .read_word(pc)
            .map_err(|_| InterpreterError::FetchFault { pc })?;
        self.pc = pc.wrapping_add(4);
        match decode(word) {
            Ok(inst) => Ok(Some(inst)),
            Err(e) => {
                trace!("{:08x}: {:08x} skipped ({})", pc, word, e);
                Ok(None)
            }
        }
    }

    /// Fetches and executes one instruction. Memory faults in loads and
    /// stores leave the machine unchanged; division by zero aborts.
    pub fn step(&mut self) -> Result<Option<Instruction>, InterpreterError> {
        let pc = self.pc;
        let Some(inst) = self.fetch()? else {
            return Ok(None);
        };
        trace!("{:08x}: {}", pc, inst);
        match self.execute(&inst) {
            Ok(()) => {}
            Err(e @ InterpreterError::DivideByZero { .. }) => return Err(e),
            Err(e) => trace!("{:08x}: fault ignored ({})", pc, e),
        }
        Ok(Some(inst))
    }

    pub fn run(&mut self, steps: usize) -> Result<(), InterpreterError> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }

    fn rs(&self, inst: &Instruction) -> u32 {
        inst.rs.map(|r| self.get(r)).unwrap_or(0)
    }

    fn rt(&self, inst: &Instruction) -> u32 {
        inst.rt.map(|r| self.get(r)).unwrap_or(0)
    }

    fn write_rt(&mut self, inst: &Instruction, value: u32) {
        if let Some(rt) = inst.rt {
            self.set(rt, value);
        }
    }

    fn write_rd(&mut self, inst: &Instruction, value: u32) {
        if let Some(rd) = inst.rd {
            self.set(rd, value);
        }
    }

    fn effective_address(&self, inst: &Instruction) -> u32 {
        self.rs(inst).wrapping_add(inst.imm_signed())
    }

    pub fn execute(&mut self, inst: &Instruction) -> Result<(), InterpreterError> {
        let rs = self.rs(inst);
        let rt = self.rt(inst);
        let sa = inst.shift.unwrap_or(0) as u32;
        let simm = inst.imm_signed();
        let uimm = inst.imm_unsigned();

        match inst.kind {
            Kind::Add | Kind::Addu => self.write_rd(inst, rs.wrapping_add(rt)),
            Kind::Sub | Kind::Subu => self.write_rd(inst, rs.wrapping_sub(rt)),
            Kind::And => self.write_rd(inst, rs & rt),
            Kind::Or => self.write_rd(inst, rs | rt),
            Kind::Xor => self.write_rd(inst, rs ^ rt),
            Kind::Nor => self.write_rd(inst, !(rs | rt)),
            Kind::Slt => self.write_rd(inst, ((rs as i32) < (rt as i32)) as u32),
            Kind::Sltu => self.write_rd(inst, (rs < rt) as u32),

            Kind::Addi | Kind::Addiu => self.write_rt(inst, rs.wrapping_add(simm)),
            Kind::Andi => self.write_rt(inst, rs & uimm),
            Kind::Ori => self.write_rt(inst, rs | uimm),
            Kind::Xori => self.write_rt(inst, rs ^ uimm),
            Kind::Slti => self.write_rt(inst, ((rs as i32) < (simm as i32)) as u32),
            Kind::Sltiu => self.write_rt(inst, (rs < simm) as u32),
            Kind::Lui => self.write_rt(inst, uimm << 16),

            Kind::Sll => self.write_rd(inst, rt << sa),
            Kind::Srl => self.write_rd(inst, rt >> sa),
            Kind::Sra => self.write_rd(inst, ((rt as i32) >> sa) as u32),
            Kind::Sllv => self.write_rd(inst, rt << (rs & 0x1F)),
            Kind::Srlv => self.write_rd(inst, rt >> (rs & 0x1F)),
            Kind::Srav => self.write_rd(inst, ((rt as i32) >> (rs & 0x1F)) as u32),

            Kind::Mult => {
                let product = (rs as i32 as i64) * (rt as i32 as i64);
                self.lo = product as u32;
                self.hi = (product >> 32) as u32;
            }
            Kind::Multu => {
                let product = (rs as u64) * (rt as u64);
                self.lo = product as u32;
                self.hi = (product >> 32) as u32;
            }
            Kind::Div => {
                if rt == 0 {
                    return Err(InterpreterError::DivideByZero { pc: self.pc.wrapping_sub(4) });
                }
                self.lo = (rs as i32).wrapping_div(rt as i32) as u32;
                self.hi = (rs as i32).wrapping_rem(rt as i32) as u32;
            }
            Kind::Divu => {
                if rt == 0 {
                    return Err(InterpreterError::DivideByZero { pc: self.pc.wrapping_sub(4) });
                }
                self.lo = rs / rt;
                self.hi = rs % rt;
            }
            Kind::Mfhi => self.write_rd(inst, self.hi),
            Kind::Mflo => self.write_rd(inst, self.lo),
            Kind::Mthi => self.hi = rs,
            Kind::Mtlo => self.lo = rs,

            Kind::Lw | Kind::Lwu => {
                let value = self.memory.read_word(self.effective_address(inst))?;
                self.write_rt(inst, value);
            }
            Kind::Lb | Kind::Lbu => {
                let addr = self.effective_address(inst);
                let byte = (self.memory.read_word(addr)? >> byte_shift(addr)) as u8;
                let value = if inst.kind == Kind::Lb {
                    byte as i8 as i32 as u32
                } else {
                    byte as u32
                };
                self.write_rt(inst, value);
            }
            Kind::Lh | Kind::Lhu => {
                let addr = self.effective_address(inst);
                let half = (self.memory.read_word(addr)? >> half_shift(addr)) as u16;
                let value = if inst.kind == Kind::Lh {
                    half as i16 as i32 as u32
                } else {
                    half as u32
                };
                self.write_rt(inst, value);
            }
            Kind::Sw => self.memory.write_word(self.effective_address(inst), rt)?,
            Kind::Sh => self.memory.write_half(self.effective_address(inst), rt as u16)?,
            Kind::Sb => self.memory.write_byte(self.effective_address(inst), rt as u8)?,

            _ => {}
        }
        Ok(())
    }
}
