// 16 8-bit data registers named V0 to VF
// VF doubles as the carry/borrow/collision flag
// I -> address register (12 bits used)
// Stack of 16 return addresses

use std::fmt;

use crate::error::{Result, VmError};
use crate::memory::{TypeAddr, PROGRAM_START};

pub const REGISTER_COUNT: usize = 16;
pub const STACK_DEPTH: usize = 16;

/// Index of a general register, always in 0..=15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reg(u8);

impl Reg {
    pub const V0: Reg = Reg(0x0);
    pub const VF: Reg = Reg(0xF);

    /// Only the low nibble is kept, matching how a register is encoded in an
    /// opcode.
    pub const fn new(index: u8) -> Self {
        Reg(index & 0xF)
    }

    pub const fn index(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    registers: [u8; REGISTER_COUNT],
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    pub fn new() -> Self {
        Self {
            registers: [0; REGISTER_COUNT],
        }
    }

    pub fn reset(&mut self) {
        self.registers = [0; REGISTER_COUNT];
    }

    pub fn set_register(&mut self, reg: Reg, value: u8) {
        self.registers[reg.0 as usize] = value;
    }

    // 7XNN has no carry, so VF is left alone
    pub fn add_to_register(&mut self, reg: Reg, value: u8) {
        let slot = &mut self.registers[reg.0 as usize];
        *slot = slot.wrapping_add(value);
    }

    pub fn get(&self, reg: Reg) -> u8 {
        self.registers[reg.0 as usize]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.registers
    }
}

// Special registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl Default for ProgramCounter {
    fn default() -> Self {
        ProgramCounter(PROGRAM_START)
    }
}

impl ProgramCounter {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(2);
    }

    pub fn skip(&mut self) {
        self.increment();
    }

    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndexRegister(pub TypeAddr);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }

    pub fn add(&mut self, value: u8) {
        self.0 = self.0.wrapping_add(value as TypeAddr);
    }
}

/// Fixed-depth return address stack. `top` is `None` while empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    addresses: [TypeAddr; STACK_DEPTH],
    top: Option<usize>,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: [0; STACK_DEPTH],
            top: None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn push(&mut self, addr: TypeAddr) -> Result<()> {
        let next = match self.top {
            None => 0,
            Some(top) if top + 1 < STACK_DEPTH => top + 1,
            Some(_) => return Err(VmError::StackOverflow),
        };
        self.addresses[next] = addr;
        self.top = Some(next);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<TypeAddr> {
        let top = self.top.ok_or(VmError::StackUnderflow)?;
        self.top = top.checked_sub(1);
        Ok(self.addresses[top])
    }

    pub fn depth(&self) -> usize {
        self.top.map_or(0, |top| top + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none()
    }
}
