use std::fmt;

use crate::error::{Result, VmError};
use crate::memory::TypeAddr;
use crate::registers::Reg;

//      NNN: address
//      NN: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInstruction {
    code: u16,
}

impl RawInstruction {
    pub fn new(code: u16) -> Self {
        RawInstruction { code }
    }

    // n is starting digit, m is length
    pub fn nth_m_digits(&self, n: u8, m: u8) -> u16 {
        // 0110 1100 1111 0001
        // -------------------
        // 1111 1111 1111 1111
        //      1111 1111 1111
        //           1111 1111
        //                1111
        //
        // 4 - (m) - (n - 1), n = 2
        let shift_places = (4 - m - (n - 1)) * 4;
        let mut mask = 0;
        for _ in 0..m {
            mask = (mask << 4) | 0b1111;
        }
        (self.code & (mask << shift_places)) >> shift_places
    }

    pub fn identifier(&self) -> u8 {
        self.nth_m_digits(1, 1) as u8
    }

    pub fn x(&self) -> Reg {
        Reg::new(self.nth_m_digits(2, 1) as u8)
    }

    pub fn y(&self) -> Reg {
        Reg::new(self.nth_m_digits(3, 1) as u8)
    }

    pub fn n(&self) -> u8 {
        self.nth_m_digits(4, 1) as u8
    }

    pub fn nn(&self) -> u8 {
        self.nth_m_digits(3, 2) as u8
    }

    pub fn nnn(&self) -> TypeAddr {
        self.nth_m_digits(2, 3)
    }
}

impl PartialEq<u16> for RawInstruction {
    fn eq(&self, ins: &u16) -> bool {
        ins.eq(&self.code)
    }
}

#[test]
fn test_bit_manip() {
    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(2, 1), 0xC);
    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(3, 1), 0xE);
    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(1, 1), 0x4);

    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(1, 2), 0x4C);
    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(2, 2), 0xCE);

    let raw = RawInstruction::new(0xD12F);
    assert_eq!(raw.identifier(), 0xD);
    assert_eq!((raw.x(), raw.y(), raw.n()), (Reg::new(1), Reg::new(2), 0xF));
    assert_eq!(raw.nn(), 0x2F);
    assert_eq!(raw.nnn(), 0x12F);
    assert!(raw == 0xD12F);
}

/// How one operand is cut out of an opcode: `(word & mask) >> shift`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    pub mask: u16,
    pub shift: u8,
}

impl Operand {
    pub const fn extract(self, word: u16) -> u16 {
        (word & self.mask) >> self.shift
    }
}

const X: Operand = Operand { mask: 0x0F00, shift: 8 };
const Y: Operand = Operand { mask: 0x00F0, shift: 4 };
const N: Operand = Operand { mask: 0x000F, shift: 0 };
const NN: Operand = Operand { mask: 0x00FF, shift: 0 };
const NNN: Operand = Operand { mask: 0x0FFF, shift: 0 };

/// Reference entry for one instruction of the base set.
#[derive(Debug, PartialEq, Eq)]
pub struct Descriptor {
    pub mnemonic: &'static str,
    pub mask: u16,
    pub pattern: u16,
    pub operands: &'static [Operand],
}

impl Descriptor {
    pub fn matches(&self, word: u16) -> bool {
        word & self.mask == self.pattern
    }

    pub fn extract(&self, word: u16) -> Vec<u16> {
        self.operands.iter().map(|op| op.extract(word)).collect()
    }
}

macro_rules! descriptor {
    ($name:ident, $mnemonic:literal, $mask:literal, $pattern:literal, [$($op:ident),*]) => {
        static $name: Descriptor = Descriptor {
            mnemonic: $mnemonic,
            mask: $mask,
            pattern: $pattern,
            operands: &[$($op),*],
        };
    };
}

descriptor!(CLS, "CLS", 0xFFFF, 0x00E0, []);
descriptor!(RET, "RET", 0xFFFF, 0x00EE, []);
descriptor!(SYS, "SYS addr", 0xF000, 0x0000, [NNN]);
descriptor!(JP, "JP addr", 0xF000, 0x1000, [NNN]);
descriptor!(CALL, "CALL addr", 0xF000, 0x2000, [NNN]);
descriptor!(SE_BYTE, "SE Vx, byte", 0xF000, 0x3000, [X, NN]);
descriptor!(SNE_BYTE, "SNE Vx, byte", 0xF000, 0x4000, [X, NN]);
descriptor!(SE_REG, "SE Vx, Vy", 0xF00F, 0x5000, [X, Y]);
descriptor!(LD_BYTE, "LD Vx, byte", 0xF000, 0x6000, [X, NN]);
descriptor!(ADD_BYTE, "ADD Vx, byte", 0xF000, 0x7000, [X, NN]);
descriptor!(LD_REG, "LD Vx, Vy", 0xF00F, 0x8000, [X, Y]);
descriptor!(OR, "OR Vx, Vy", 0xF00F, 0x8001, [X, Y]);
descriptor!(AND, "AND Vx, Vy", 0xF00F, 0x8002, [X, Y]);
descriptor!(XOR, "XOR Vx, Vy", 0xF00F, 0x8003, [X, Y]);
descriptor!(ADD_REG, "ADD Vx, Vy", 0xF00F, 0x8004, [X, Y]);
descriptor!(SUB, "SUB Vx, Vy", 0xF00F, 0x8005, [X, Y]);
descriptor!(SHR, "SHR Vx {, Vy}", 0xF00F, 0x8006, [X, Y]);
descriptor!(SUBN, "SUBN Vx, Vy", 0xF00F, 0x8007, [X, Y]);
descriptor!(SHL, "SHL Vx {, Vy}", 0xF00F, 0x800E, [X, Y]);
descriptor!(SNE_REG, "SNE Vx, Vy", 0xF00F, 0x9000, [X, Y]);
descriptor!(LD_I, "LD I, addr", 0xF000, 0xA000, [NNN]);
descriptor!(JP_V0, "JP V0, addr", 0xF000, 0xB000, [NNN]);
descriptor!(RND, "RND Vx, byte", 0xF000, 0xC000, [X, NN]);
descriptor!(DRW, "DRW Vx, Vy, nibble", 0xF000, 0xD000, [X, Y, N]);
descriptor!(SKP, "SKP Vx", 0xF0FF, 0xE09E, [X]);
descriptor!(SKNP, "SKNP Vx", 0xF0FF, 0xE0A1, [X]);
descriptor!(LD_VX_DT, "LD Vx, DT", 0xF0FF, 0xF007, [X]);
descriptor!(LD_VX_K, "LD Vx, K", 0xF0FF, 0xF00A, [X]);
descriptor!(LD_DT_VX, "LD DT, Vx", 0xF0FF, 0xF015, [X]);
descriptor!(LD_ST_VX, "LD ST, Vx", 0xF0FF, 0xF018, [X]);
descriptor!(ADD_I, "ADD I, Vx", 0xF0FF, 0xF01E, [X]);
descriptor!(LD_F, "LD F, Vx", 0xF0FF, 0xF029, [X]);
descriptor!(LD_B, "LD B, Vx", 0xF0FF, 0xF033, [X]);
descriptor!(LD_STORE, "LD [I], Vx", 0xF0FF, 0xF055, [X]);
descriptor!(LD_LOAD, "LD Vx, [I]", 0xF0FF, 0xF065, [X]);

/// The base instruction set in match order. The first entry whose mask and
/// pattern fit a word names that word's instruction, so `00E0`/`00EE` sit
/// ahead of the catch-all `0NNN`.
pub static OPCODE_TABLE: [&Descriptor; 35] = [
    &CLS, &RET, &SYS, &JP, &CALL, &SE_BYTE, &SNE_BYTE, &SE_REG, &LD_BYTE, &ADD_BYTE, &LD_REG,
    &OR, &AND, &XOR, &ADD_REG, &SUB, &SHR, &SUBN, &SHL, &SNE_REG, &LD_I, &JP_V0, &RND, &DRW,
    &SKP, &SKNP, &LD_VX_DT, &LD_VX_K, &LD_DT_VX, &LD_ST_VX, &ADD_I, &LD_F, &LD_B, &LD_STORE,
    &LD_LOAD,
];

pub fn lookup(word: u16) -> Option<&'static Descriptor> {
    OPCODE_TABLE.iter().copied().find(|d| d.matches(word))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCodes {
    // 0NNN
    // machine code routine on the original hardware, ignored here
    Sys(TypeAddr),
    // 00E0
    // turn all pixels to 0
    ClearScreen,
    // 00EE
    PopSubroutine,
    // 1NNN
    // set PC to address NNN, "jump" to memory location
    Jump(TypeAddr),
    // 2NNN
    PushSubroutine(TypeAddr),

    // 3XNN
    SkipEqualConstant(Reg, u8),
    // 4XNN
    SkipNotEqualConstant(Reg, u8),
    // 5XY0
    SkipEqualRegister(Reg, Reg),
    // 9XY0
    SkipNotEqualRegister(Reg, Reg),

    // 6XNN
    // set register VX to value NN
    SetRegister(Reg, u8),
    // 7XNN
    // add value NN to VX, no carry
    AddToRegister(Reg, u8),

    // 8XY0
    CopyRegister(Reg, Reg),
    // 8XY1
    Or(Reg, Reg),
    // 8XY2
    And(Reg, Reg),
    // 8XY3
    XOr(Reg, Reg),
    // 8XY4
    Add(Reg, Reg),
    // 8XY5
    SubtractForward(Reg, Reg),
    // 8XY6
    RightShift(Reg, Reg),
    // 8XY7
    SubtractBackward(Reg, Reg),
    // 8XYE
    LeftShift(Reg, Reg),

    // ANNN
    // set index register I to address NNN
    SetIndexRegister(TypeAddr),
    // BNNN
    JumpWithOffset(TypeAddr),
    // CXNN
    Random(Reg, u8),
    // DXYN
    // draw an N pixel tall sprite starting at I
    // at Coordinates (VX, VY)
    // XOR pixels on screen using sprite data
    // if pixels on screen were switched OFF: VF set to 1
    Display(Reg, Reg, u8),

    // EX9E
    SkipIfPressed(Reg),
    // EXA1
    SkipIfNotPressed(Reg),

    // FX07
    CopyDelayToRegister(Reg),
    // FX0A
    GetKey(Reg),
    // FX15
    CopyRegisterToDelay(Reg),
    // FX18
    CopyRegisterToSound(Reg),
    // FX1E
    AddToIndex(Reg),
    // FX29
    PointChar(Reg),
    // FX33
    ToDecimal(Reg),
    // FX55
    StoreRegisterToMemory(Reg),
    // FX65
    LoadRegisterFromMemory(Reg),
}

impl OpCodes {
    pub fn decode_raw(ins: u16) -> Result<Self> {
        let raw = RawInstruction::new(ins);
        let unknown = Err(VmError::UnknownOpcode { opcode: ins });

        let op = match raw.identifier() {
            0x0 => match ins {
                0x00E0 => Self::ClearScreen,
                0x00EE => Self::PopSubroutine,
                _ => Self::Sys(raw.nnn()),
            },
            0x1 => Self::Jump(raw.nnn()),
            0x2 => Self::PushSubroutine(raw.nnn()),
            0x3 => Self::SkipEqualConstant(raw.x(), raw.nn()),
            0x4 => Self::SkipNotEqualConstant(raw.x(), raw.nn()),
            0x5 if raw.n() == 0 => Self::SkipEqualRegister(raw.x(), raw.y()),
            0x6 => Self::SetRegister(raw.x(), raw.nn()),
            0x7 => Self::AddToRegister(raw.x(), raw.nn()),
            0x8 => {
                let (x, y) = (raw.x(), raw.y());
                match raw.n() {
                    0x0 => Self::CopyRegister(x, y),
                    0x1 => Self::Or(x, y),
                    0x2 => Self::And(x, y),
                    0x3 => Self::XOr(x, y),
                    0x4 => Self::Add(x, y),
                    0x5 => Self::SubtractForward(x, y),
                    0x6 => Self::RightShift(x, y),
                    0x7 => Self::SubtractBackward(x, y),
                    0xE => Self::LeftShift(x, y),
                    _ => return unknown,
                }
            }
            0x9 if raw.n() == 0 => Self::SkipNotEqualRegister(raw.x(), raw.y()),
            0xA => Self::SetIndexRegister(raw.nnn()),
            0xB => Self::JumpWithOffset(raw.nnn()),
            0xC => Self::Random(raw.x(), raw.nn()),
            0xD => Self::Display(raw.x(), raw.y(), raw.n()),
            0xE => match raw.nn() {
                0x9E => Self::SkipIfPressed(raw.x()),
                0xA1 => Self::SkipIfNotPressed(raw.x()),
                _ => return unknown,
            },
            0xF => {
                let x = raw.x();
                match raw.nn() {
                    0x07 => Self::CopyDelayToRegister(x),
                    0x0A => Self::GetKey(x),
                    0x15 => Self::CopyRegisterToDelay(x),
                    0x18 => Self::CopyRegisterToSound(x),
                    0x1E => Self::AddToIndex(x),
                    0x29 => Self::PointChar(x),
                    0x33 => Self::ToDecimal(x),
                    0x55 => Self::StoreRegisterToMemory(x),
                    0x65 => Self::LoadRegisterFromMemory(x),
                    _ => return unknown,
                }
            }
            _ => return unknown,
        };
        Ok(op)
    }

    pub fn encode(&self) -> u16 {
        fn xnn(base: u16, x: Reg, nn: u8) -> u16 {
            base | (x.index() as u16) << 8 | nn as u16
        }
        fn xyn(base: u16, x: Reg, y: Reg, n: u8) -> u16 {
            base | (x.index() as u16) << 8 | (y.index() as u16) << 4 | (n & 0xF) as u16
        }
        fn x(base: u16, x: Reg) -> u16 {
            xnn(base, x, 0)
        }

        match *self {
            Self::Sys(addr) => addr & 0x0FFF,
            Self::ClearScreen => 0x00E0,
            Self::PopSubroutine => 0x00EE,
            Self::Jump(addr) => 0x1000 | (addr & 0x0FFF),
            Self::PushSubroutine(addr) => 0x2000 | (addr & 0x0FFF),
            Self::SkipEqualConstant(vx, nn) => xnn(0x3000, vx, nn),
            Self::SkipNotEqualConstant(vx, nn) => xnn(0x4000, vx, nn),
            Self::SkipEqualRegister(vx, vy) => xyn(0x5000, vx, vy, 0),
            Self::SetRegister(vx, nn) => xnn(0x6000, vx, nn),
            Self::AddToRegister(vx, nn) => xnn(0x7000, vx, nn),
            Self::CopyRegister(vx, vy) => xyn(0x8000, vx, vy, 0x0),
            Self::Or(vx, vy) => xyn(0x8000, vx, vy, 0x1),
            Self::And(vx, vy) => xyn(0x8000, vx, vy, 0x2),
            Self::XOr(vx, vy) => xyn(0x8000, vx, vy, 0x3),
            Self::Add(vx, vy) => xyn(0x8000, vx, vy, 0x4),
            Self::SubtractForward(vx, vy) => xyn(0x8000, vx, vy, 0x5),
            Self::RightShift(vx, vy) => xyn(0x8000, vx, vy, 0x6),
            Self::SubtractBackward(vx, vy) => xyn(0x8000, vx, vy, 0x7),
            Self::LeftShift(vx, vy) => xyn(0x8000, vx, vy, 0xE),
            Self::SkipNotEqualRegister(vx, vy) => xyn(0x9000, vx, vy, 0),
            Self::SetIndexRegister(addr) => 0xA000 | (addr & 0x0FFF),
            Self::JumpWithOffset(addr) => 0xB000 | (addr & 0x0FFF),
            Self::Random(vx, nn) => xnn(0xC000, vx, nn),
            Self::Display(vx, vy, n) => xyn(0xD000, vx, vy, n),
            Self::SkipIfPressed(vx) => x(0xE09E, vx),
            Self::SkipIfNotPressed(vx) => x(0xE0A1, vx),
            Self::CopyDelayToRegister(vx) => x(0xF007, vx),
            Self::GetKey(vx) => x(0xF00A, vx),
            Self::CopyRegisterToDelay(vx) => x(0xF015, vx),
            Self::CopyRegisterToSound(vx) => x(0xF018, vx),
            Self::AddToIndex(vx) => x(0xF01E, vx),
            Self::PointChar(vx) => x(0xF029, vx),
            Self::ToDecimal(vx) => x(0xF033, vx),
            Self::StoreRegisterToMemory(vx) => x(0xF055, vx),
            Self::LoadRegisterFromMemory(vx) => x(0xF065, vx),
        }
    }

    pub fn descriptor(&self) -> &'static Descriptor {
        match self {
            Self::Sys(_) => &SYS,
            Self::ClearScreen => &CLS,
            Self::PopSubroutine => &RET,
            Self::Jump(_) => &JP,
            Self::PushSubroutine(_) => &CALL,
            Self::SkipEqualConstant(..) => &SE_BYTE,
            Self::SkipNotEqualConstant(..) => &SNE_BYTE,
            Self::SkipEqualRegister(..) => &SE_REG,
            Self::SetRegister(..) => &LD_BYTE,
            Self::AddToRegister(..) => &ADD_BYTE,
            Self::CopyRegister(..) => &LD_REG,
            Self::Or(..) => &OR,
            Self::And(..) => &AND,
            Self::XOr(..) => &XOR,
            Self::Add(..) => &ADD_REG,
            Self::SubtractForward(..) => &SUB,
            Self::RightShift(..) => &SHR,
            Self::SubtractBackward(..) => &SUBN,
            Self::LeftShift(..) => &SHL,
            Self::SkipNotEqualRegister(..) => &SNE_REG,
            Self::SetIndexRegister(_) => &LD_I,
            Self::JumpWithOffset(_) => &JP_V0,
            Self::Random(..) => &RND,
            Self::Display(..) => &DRW,
            Self::SkipIfPressed(_) => &SKP,
            Self::SkipIfNotPressed(_) => &SKNP,
            Self::CopyDelayToRegister(_) => &LD_VX_DT,
            Self::GetKey(_) => &LD_VX_K,
            Self::CopyRegisterToDelay(_) => &LD_DT_VX,
            Self::CopyRegisterToSound(_) => &LD_ST_VX,
            Self::AddToIndex(_) => &ADD_I,
            Self::PointChar(_) => &LD_F,
            Self::ToDecimal(_) => &LD_B,
            Self::StoreRegisterToMemory(_) => &LD_STORE,
            Self::LoadRegisterFromMemory(_) => &LD_LOAD,
        }
    }

    pub fn operands(&self) -> Vec<u16> {
        self.descriptor().extract(self.encode())
    }
}

/// Disassembly, e.g. `LD VA, 0x07` or `DRW V0, V1, 5`.
impl fmt::Display for OpCodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Sys(addr) => write!(f, "SYS {addr:#05X}"),
            Self::ClearScreen => write!(f, "CLS"),
            Self::PopSubroutine => write!(f, "RET"),
            Self::Jump(addr) => write!(f, "JP {addr:#05X}"),
            Self::PushSubroutine(addr) => write!(f, "CALL {addr:#05X}"),
            Self::SkipEqualConstant(vx, nn) => write!(f, "SE {vx}, {nn:#04X}"),
            Self::SkipNotEqualConstant(vx, nn) => write!(f, "SNE {vx}, {nn:#04X}"),
            Self::SkipEqualRegister(vx, vy) => write!(f, "SE {vx}, {vy}"),
            Self::SkipNotEqualRegister(vx, vy) => write!(f, "SNE {vx}, {vy}"),
            Self::SetRegister(vx, nn) => write!(f, "LD {vx}, {nn:#04X}"),
            Self::AddToRegister(vx, nn) => write!(f, "ADD {vx}, {nn:#04X}"),
            Self::CopyRegister(vx, vy) => write!(f, "LD {vx}, {vy}"),
            Self::Or(vx, vy) => write!(f, "OR {vx}, {vy}"),
            Self::And(vx, vy) => write!(f, "AND {vx}, {vy}"),
            Self::XOr(vx, vy) => write!(f, "XOR {vx}, {vy}"),
            Self::Add(vx, vy) => write!(f, "ADD {vx}, {vy}"),
            Self::SubtractForward(vx, vy) => write!(f, "SUB {vx}, {vy}"),
            Self::RightShift(vx, _) => write!(f, "SHR {vx}"),
            Self::SubtractBackward(vx, vy) => write!(f, "SUBN {vx}, {vy}"),
            Self::LeftShift(vx, _) => write!(f, "SHL {vx}"),
            Self::SetIndexRegister(addr) => write!(f, "LD I, {addr:#05X}"),
            Self::JumpWithOffset(addr) => write!(f, "JP V0, {addr:#05X}"),
            Self::Random(vx, nn) => write!(f, "RND {vx}, {nn:#04X}"),
            Self::Display(vx, vy, n) => write!(f, "DRW {vx}, {vy}, {n}"),
            Self::SkipIfPressed(vx) => write!(f, "SKP {vx}"),
            Self::SkipIfNotPressed(vx) => write!(f, "SKNP {vx}"),
            Self::CopyDelayToRegister(vx) => write!(f, "LD {vx}, DT"),
            Self::GetKey(vx) => write!(f, "LD {vx}, K"),
            Self::CopyRegisterToDelay(vx) => write!(f, "LD DT, {vx}"),
            Self::CopyRegisterToSound(vx) => write!(f, "LD ST, {vx}"),
            Self::AddToIndex(vx) => write!(f, "ADD I, {vx}"),
            Self::PointChar(vx) => write!(f, "LD F, {vx}"),
            Self::ToDecimal(vx) => write!(f, "LD B, {vx}"),
            Self::StoreRegisterToMemory(vx) => write!(f, "LD [I], {vx}"),
            Self::LoadRegisterFromMemory(vx) => write!(f, "LD {vx}, [I]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_representative_words() {
        let cases = [
            (0x00E0, OpCodes::ClearScreen),
            (0x00EE, OpCodes::PopSubroutine),
            (0x0123, OpCodes::Sys(0x123)),
            (0x1ABC, OpCodes::Jump(0xABC)),
            (0x2ABC, OpCodes::PushSubroutine(0xABC)),
            (0x6A07, OpCodes::SetRegister(Reg::new(0xA), 0x07)),
            (0x7A05, OpCodes::AddToRegister(Reg::new(0xA), 0x05)),
            (0x8124, OpCodes::Add(Reg::new(1), Reg::new(2))),
            (0x812E, OpCodes::LeftShift(Reg::new(1), Reg::new(2))),
            (0xD125, OpCodes::Display(Reg::new(1), Reg::new(2), 5)),
            (0xE39E, OpCodes::SkipIfPressed(Reg::new(3))),
            (0xF30A, OpCodes::GetKey(Reg::new(3))),
            (0xF565, OpCodes::LoadRegisterFromMemory(Reg::new(5))),
        ];
        for (word, expected) in cases {
            assert_eq!(OpCodes::decode_raw(word), Ok(expected), "{word:#06X}");
        }
    }

    #[test]
    fn rejects_words_outside_the_base_set() {
        for word in [0x5121, 0x9123, 0x8128, 0x812F, 0xE100, 0xF1FF, 0xF000] {
            assert_eq!(
                OpCodes::decode_raw(word),
                Err(VmError::UnknownOpcode { opcode: word }),
                "{word:#06X}"
            );
        }
    }

    #[test]
    fn table_patterns_fit_their_masks() {
        for d in OPCODE_TABLE.iter() {
            assert_eq!(d.pattern & !d.mask, 0, "{}", d.mnemonic);
            for op in d.operands {
                assert_eq!(op.mask & d.mask, 0, "{} operand overlaps opcode bits", d.mnemonic);
            }
        }
    }

    // every one of the 65536 words: the typed decoder and the first-match
    // table agree, and decoded instructions assemble back to the same word
    #[test]
    fn typed_decode_agrees_with_table() {
        for word in 0..=u16::MAX {
            match (OpCodes::decode_raw(word), lookup(word)) {
                (Ok(op), Some(d)) => {
                    assert!(std::ptr::eq(op.descriptor(), d), "{word:#06X} -> {op:?}");
                    assert_eq!(op.encode(), word);
                    assert_eq!(op.operands(), d.extract(word));
                }
                (Err(VmError::UnknownOpcode { opcode }), None) => assert_eq!(opcode, word),
                (decoded, found) => panic!("{word:#06X}: {decoded:?} vs {found:?}"),
            }
        }
    }

    #[test]
    fn operand_order_follows_descriptor() {
        let op = OpCodes::decode_raw(0xD12F).unwrap();
        assert_eq!(op.operands(), vec![0x1, 0x2, 0xF]);
        assert_eq!(op.descriptor().mnemonic, "DRW Vx, Vy, nibble");

        let op = OpCodes::decode_raw(0x3A42).unwrap();
        assert_eq!(op.operands(), vec![0xA, 0x42]);
    }

    #[test]
    fn disassembles() {
        assert_eq!(OpCodes::SetRegister(Reg::new(0xA), 7).to_string(), "LD VA, 0x07");
        assert_eq!(OpCodes::Jump(0x200).to_string(), "JP 0x200");
        assert_eq!(
            OpCodes::Display(Reg::V0, Reg::new(1), 5).to_string(),
            "DRW V0, V1, 5"
        );
        assert_eq!(OpCodes::StoreRegisterToMemory(Reg::VF).to_string(), "LD [I], VF");
    }
}
