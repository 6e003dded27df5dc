use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{
    decode::OpCodes,
    display::FrameBuffer,
    error::{Fault, Result},
    keyboard::Keyboard,
    memory::{font_addr, Memory, TypeAddr},
    registers::{IndexRegister, ProgramCounter, Reg, Registers, Stack},
    timer::Timers,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecState {
    Running,
    /// `FX0A` is pending; the next key-down lands in this register.
    WaitingForKey(Reg),
    /// A fatal error stopped the program. Only `load_rom` leaves this state.
    Halted(Fault),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Executed(OpCodes),
    WaitingForKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    pub address: TypeAddr,
    pub opcode: Option<u16>,
    pub instruction: Option<OpCodes>,
}

impl Trace {
    fn at(address: TypeAddr) -> Self {
        Self {
            address,
            opcode: None,
            instruction: None,
        }
    }

    pub fn operands(&self) -> Vec<u16> {
        self.instruction
            .map(|op| op.operands())
            .unwrap_or_default()
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06X}:", self.address)?;
        match (self.opcode, self.instruction) {
            (Some(word), Some(op)) => {
                let operands: Vec<String> =
                    self.operands().iter().map(|v| format!("{v:#X}")).collect();
                write!(
                    f,
                    " {word:04X} {} [{}]",
                    op.descriptor().mnemonic,
                    operands.join(", ")
                )
            }
            (Some(word), None) => write!(f, " {word:04X} ???"),
            _ => write!(f, " <no fetch>"),
        }
    }
}

pub struct Emulator {
    fb: FrameBuffer,
    keyboard: Keyboard,
    pub regs: Registers,
    pub mem: Memory,
    pub pc: ProgramCounter,
    pub index: IndexRegister,
    pub stack: Stack,
    pub timers: Timers,
    state: ExecState,
    last_trace: Option<Trace>,
    rng: StdRng,
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Emulator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Same program, same seed, same `CXNN` results.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            fb: FrameBuffer::new(),
            keyboard: Keyboard::new(),
            regs: Registers::new(),
            mem: Memory::new(),
            pc: ProgramCounter::default(),
            index: IndexRegister::default(),
            stack: Stack::new(),
            timers: Timers::default(),
            state: ExecState::Running,
            last_trace: None,
            rng,
        }
    }

    /// Reset the whole machine and place `rom` at 0x200.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        self.mem.load_rom(rom)?;
        self.regs.reset();
        self.pc = ProgramCounter::default();
        self.index = IndexRegister::default();
        self.stack.reset();
        self.timers.reset();
        self.fb.clear_buffer();
        self.keyboard.reset();
        self.state = ExecState::Running;
        self.last_trace = None;
        log::info!("loaded {} byte rom", rom.len());
        Ok(())
    }

    /// Run one instruction. Does not touch the timers.
    pub fn step(&mut self) -> std::result::Result<Status, Fault> {
        match &self.state {
            ExecState::Halted(fault) => return Err(fault.clone()),
            ExecState::WaitingForKey(_) => return Ok(Status::WaitingForKey),
            ExecState::Running => {}
        }

        let mut trace = Trace::at(self.pc.0);
        let outcome = self.cycle(&mut trace);
        log::trace!("{trace}");
        self.last_trace = Some(trace.clone());

        match outcome {
            Ok(op) => Ok(Status::Executed(op)),
            Err(source) => {
                let fault = Fault { trace, source };
                self.state = ExecState::Halted(fault.clone());
                Err(fault)
            }
        }
    }

    fn cycle(&mut self, trace: &mut Trace) -> Result<OpCodes> {
        let ins = self.fetch()?;
        trace.opcode = Some(ins);
        let op = OpCodes::decode_raw(ins)?;
        trace.instruction = Some(op);
        self.execute_ins(op)?;
        Ok(op)
    }

    pub fn fetch(&mut self) -> Result<u16> {
        let ins = self.mem.next_instruction(self.pc.0)?;
        self.pc.increment();
        Ok(ins)
    }

    pub fn execute_ins(&mut self, ins: OpCodes) -> Result<()> {
        match ins {
            OpCodes::Sys(addr) => {
                log::debug!("ignoring machine routine call to {addr:#05X}");
            }
            OpCodes::ClearScreen => {
                self.fb.clear_buffer();
            }
            OpCodes::Jump(addr) => {
                self.pc.set_addr(addr);
            }
            OpCodes::PushSubroutine(addr) => {
                self.stack.push(self.pc.0)?; // where to come back to
                self.pc.set_addr(addr);
            }
            OpCodes::PopSubroutine => {
                let addr = self.stack.pop()?;
                self.pc.set_addr(addr);
            }
            OpCodes::SkipEqualConstant(vx, nn) => {
                if self.regs.get(vx) == nn {
                    self.pc.skip();
                }
            }
            OpCodes::SkipNotEqualConstant(vx, nn) => {
                if self.regs.get(vx) != nn {
                    self.pc.skip();
                }
            }
            OpCodes::SkipEqualRegister(vx, vy) => {
                if self.regs.get(vx) == self.regs.get(vy) {
                    self.pc.skip();
                }
            }
            OpCodes::SkipNotEqualRegister(vx, vy) => {
                if self.regs.get(vx) != self.regs.get(vy) {
                    self.pc.skip();
                }
            }
            OpCodes::SetRegister(vx, nn) => {
                self.regs.set_register(vx, nn);
            }
            OpCodes::AddToRegister(vx, nn) => {
                self.regs.add_to_register(vx, nn);
            }
            OpCodes::CopyRegister(vx, vy) => {
                self.regs.set_register(vx, self.regs.get(vy));
            }
            OpCodes::Or(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) | self.regs.get(vy));
            }
            OpCodes::And(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) & self.regs.get(vy));
            }
            OpCodes::XOr(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) ^ self.regs.get(vy));
            }
            // For the flag-producing ALU ops both results come from the
            // operands' old values; VF is written first, then VX.
            OpCodes::Add(vx, vy) => {
                let (sum, carry) = self.regs.get(vx).overflowing_add(self.regs.get(vy));
                self.set_flag_then(vx, carry, sum);
            }
            OpCodes::SubtractForward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.set_flag_then(vx, x > y, x.wrapping_sub(y)); // flag = no borrow
            }
            OpCodes::SubtractBackward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.set_flag_then(vx, y > x, y.wrapping_sub(x));
            }
            OpCodes::RightShift(vx, _) => {
                let vx_value = self.regs.get(vx);
                self.set_flag_then(vx, vx_value & 1 == 1, vx_value >> 1);
            }
            OpCodes::LeftShift(vx, _) => {
                let vx_value = self.regs.get(vx);
                self.set_flag_then(vx, (vx_value >> 7) & 1 == 1, vx_value << 1);
            }
            OpCodes::SetIndexRegister(addr) => self.index.set_addr(addr),
            OpCodes::JumpWithOffset(addr) => {
                self.pc.set_addr(addr.wrapping_add(self.regs.get(Reg::V0) as TypeAddr));
            }
            OpCodes::Random(vx, nn) => {
                let ransuu: u8 = self.rng.gen();
                self.regs.set_register(vx, nn & ransuu);
            }
            OpCodes::Display(reg_x, reg_y, height) => {
                let (x, y) = (self.regs.get(reg_x), self.regs.get(reg_y));
                self.regs.set_register(Reg::VF, 0);
                // one byte per row, 8 pixels wide
                let sprite = self.mem.slice(self.index.0 as usize, height as usize)?;
                log::debug!("painting sprite at ({x}, {y}): {sprite:02X?}");
                let vf = self.fb.paint(x, y, sprite);
                self.regs.set_register(Reg::VF, vf as u8);
            }
            OpCodes::SkipIfPressed(vx) => {
                if self.keyboard.is_held(self.regs.get(vx)) {
                    self.pc.skip();
                }
            }
            OpCodes::SkipIfNotPressed(vx) => {
                if !self.keyboard.is_held(self.regs.get(vx)) {
                    self.pc.skip();
                }
            }
            OpCodes::CopyDelayToRegister(vx) => self.regs.set_register(vx, self.timers.delay.count),
            OpCodes::CopyRegisterToDelay(vx) => self.timers.delay.set(self.regs.get(vx)),
            OpCodes::CopyRegisterToSound(vx) => self.timers.sound.set(self.regs.get(vx)),
            OpCodes::GetKey(vx) => {
                log::debug!("waiting for a key press into {vx}");
                self.state = ExecState::WaitingForKey(vx);
            }
            OpCodes::AddToIndex(vx) => {
                self.index.add(self.regs.get(vx));
            }
            OpCodes::PointChar(vx) => {
                self.index.set_addr(font_addr(self.regs.get(vx)));
            }
            OpCodes::ToDecimal(vx) => {
                let value = self.regs.get(vx);
                let digits = [value / 100, (value / 10) % 10, value % 10];
                let base = self.index.0 as usize;
                for (i, digit) in digits.into_iter().enumerate() {
                    self.mem.set(base + i, digit)?;
                }
            }
            // both bulk transfers include VX itself and leave I where it was
            OpCodes::StoreRegisterToMemory(vx) => {
                let base = self.index.0 as usize;
                for reg in 0..=vx.index() {
                    self.mem.set(base + reg as usize, self.regs.get(Reg::new(reg)))?;
                }
            }
            OpCodes::LoadRegisterFromMemory(vx) => {
                let base = self.index.0 as usize;
                for reg in 0..=vx.index() {
                    let reg_val = self.mem.get(base + reg as usize)?;
                    self.regs.set_register(Reg::new(reg), reg_val);
                }
            }
        }
        Ok(())
    }

    fn set_flag_then(&mut self, vx: Reg, flag: bool, value: u8) {
        self.regs.set_register(Reg::VF, flag as u8);
        self.regs.set_register(vx, value);
    }

    pub fn tick_timers(&mut self) {
        self.timers.tick();
    }

    pub fn report_key_down(&mut self, code: u8) -> Result<()> {
        self.keyboard.press(code)?;
        if let ExecState::WaitingForKey(reg) = self.state {
            log::debug!("key {code:X} resolves wait on {reg}");
            self.regs.set_register(reg, code);
            self.state = ExecState::Running;
        }
        Ok(())
    }

    pub fn report_key_up(&mut self, code: u8) -> Result<()> {
        self.keyboard.release(code)
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.fb
    }

    /// The framebuffer, but only if it changed since the last call.
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.fb.take_dirty() {
            Some(&self.fb)
        } else {
            None
        }
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn sound_active(&self) -> bool {
        self.timers.sound.count > 0
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay.count
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.sound.count
    }

    pub fn state(&self) -> &ExecState {
        &self.state
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self.state, ExecState::WaitingForKey(_))
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.state, ExecState::Halted(_))
    }

    pub fn last_trace(&self) -> Option<&Trace> {
        self.last_trace.as_ref()
    }
}
