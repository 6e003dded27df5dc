use chip8_vm::decode::OpCodes;
use chip8_vm::display::WIDTH;
use chip8_vm::emulator::{Emulator, Status};
use chip8_vm::error::VmError;
use chip8_vm::memory::{font_addr, DEFAULT_FONT, PROGRAM_START};
use chip8_vm::registers::{Reg, STACK_DEPTH};
use proptest::prelude::*;

fn assemble(program: &[OpCodes]) -> Vec<u8> {
    program
        .iter()
        .flat_map(|op| op.encode().to_be_bytes())
        .collect()
}

fn boot(program: &[OpCodes]) -> Emulator {
    let mut emu = Emulator::with_seed(0);
    emu.load_rom(&assemble(program)).unwrap();
    emu
}

#[test]
fn font_is_installed_on_load() {
    let mut emu = Emulator::new();
    emu.load_rom(&[]).unwrap();
    for digit in 0..16u8 {
        let addr = font_addr(digit) as usize;
        assert_eq!(addr, 5 * digit as usize);
        assert_eq!(
            emu.mem.slice(addr, 5).unwrap(),
            &DEFAULT_FONT[5 * digit as usize..5 * digit as usize + 5]
        );
    }
}

#[test]
fn clear_then_jump_to_self() {
    let mut emu = Emulator::new();
    emu.load_rom(&[0x00, 0xE0, 0x12, 0x00]).unwrap();

    emu.step().unwrap();
    assert!(emu.framebuffer().is_blank());
    assert_eq!(emu.pc.0, 0x202);

    emu.step().unwrap();
    assert_eq!(emu.pc.0, 512);
    for _ in 0..100 {
        emu.step().unwrap();
        emu.step().unwrap();
        assert_eq!(emu.pc.0, 512);
    }
}

#[test]
fn add_immediate_has_no_carry() {
    let mut emu = Emulator::new();
    emu.load_rom(&[0x6A, 0x07, 0x7A, 0x05]).unwrap();
    emu.step().unwrap();
    emu.step().unwrap();
    assert_eq!(emu.regs.get(Reg::new(0xA)), 12);
    assert_eq!(emu.regs.get(Reg::VF), 0);

    let mut emu = boot(&[
        OpCodes::SetRegister(Reg::VF, 0x55),
        OpCodes::SetRegister(Reg::new(1), 0xFF),
        OpCodes::AddToRegister(Reg::new(1), 0x02),
    ]);
    for _ in 0..3 {
        emu.step().unwrap();
    }
    assert_eq!(emu.regs.get(Reg::new(1)), 0x01);
    assert_eq!(emu.regs.get(Reg::VF), 0x55);
}

#[test]
fn sixteen_nested_calls_fit_the_seventeenth_faults() {
    // every call targets the next word, so each step nests one level deeper
    let program: Vec<OpCodes> = (0..=STACK_DEPTH as u16)
        .map(|i| OpCodes::PushSubroutine(PROGRAM_START + 2 * (i + 1)))
        .collect();
    let mut emu = boot(&program);
    for _ in 0..STACK_DEPTH {
        assert!(matches!(emu.step(), Ok(Status::Executed(OpCodes::PushSubroutine(_)))));
    }
    assert_eq!(emu.stack.depth(), STACK_DEPTH);

    let fault = emu.step().unwrap_err();
    assert_eq!(fault.source, VmError::StackOverflow);
    assert_eq!(
        fault.trace.instruction,
        Some(OpCodes::PushSubroutine(PROGRAM_START + 2 * (STACK_DEPTH as u16 + 1)))
    );
    assert!(emu.is_halted());
}

#[test]
fn return_without_call_faults() {
    let mut emu = boot(&[OpCodes::PopSubroutine]);
    assert_eq!(emu.step().unwrap_err().source, VmError::StackUnderflow);
}

#[test]
fn running_off_the_end_of_memory_faults() {
    let mut emu = boot(&[OpCodes::Jump(0xFFE)]);
    emu.step().unwrap();
    // 0xFFE holds 0000, a no-op, and then there is nothing left to fetch
    emu.step().unwrap();
    let fault = emu.step().unwrap_err();
    assert_eq!(fault.source, VmError::MemoryOutOfBounds { address: 0x1000 });
    assert_eq!(fault.trace.address, 0x1000);
    assert_eq!(fault.trace.opcode, None);
}

#[test]
fn bulk_store_into_font_faults() {
    let mut emu = boot(&[
        OpCodes::SetIndexRegister(0x040),
        OpCodes::StoreRegisterToMemory(Reg::new(3)),
    ]);
    emu.step().unwrap();
    assert_eq!(
        emu.step().unwrap_err().source,
        VmError::ReservedWrite { address: 0x040 }
    );
}

#[test]
fn draw_twice_at_same_spot_collides() {
    let mut emu = boot(&[
        OpCodes::SetRegister(Reg::new(0), 10),
        OpCodes::SetRegister(Reg::new(1), 5),
        OpCodes::SetIndexRegister(0x300),
        OpCodes::Display(Reg::new(0), Reg::new(1), 1),
        OpCodes::Display(Reg::new(0), Reg::new(1), 1),
    ]);
    emu.mem.set(0x300, 0b1000_0000).unwrap();

    for _ in 0..4 {
        emu.step().unwrap();
    }
    assert!(emu.framebuffer().get(10, 5));
    assert_eq!(emu.regs.get(Reg::VF), 0);

    emu.step().unwrap();
    assert!(!emu.framebuffer().get(10, 5));
    assert_eq!(emu.regs.get(Reg::VF), 1);
}

#[test]
fn draw_wraps_at_right_edge() {
    let mut emu = boot(&[
        OpCodes::SetRegister(Reg::new(0), 63),
        OpCodes::SetRegister(Reg::new(1), 0),
        OpCodes::SetIndexRegister(0x300),
        OpCodes::Display(Reg::new(0), Reg::new(1), 1),
    ]);
    emu.mem.set(0x300, 0xFF).unwrap();
    for _ in 0..4 {
        emu.step().unwrap();
    }
    let fb = emu.framebuffer();
    assert!(fb.get(63, 0));
    // pixel 7 of the row lands at (63 + 7) mod 64
    assert!(fb.get((63 + 7) % WIDTH, 0));
    assert!(fb.get(6, 0));
    assert!(!fb.get(7, 0));
    assert_eq!(emu.regs.get(Reg::VF), 0);
}

#[test]
fn key_wait_resolves_on_key_down() {
    let mut emu = boot(&[
        OpCodes::GetKey(Reg::new(4)),
        OpCodes::SkipIfPressed(Reg::new(4)),
        OpCodes::SetRegister(Reg::new(5), 0xAA),
    ]);
    emu.step().unwrap();
    assert_eq!(emu.step(), Ok(Status::WaitingForKey));

    emu.report_key_down(0xB).unwrap();
    assert_eq!(emu.regs.get(Reg::new(4)), 0xB);
    emu.step().unwrap();
    emu.step().unwrap();
    // the key is still held, so the load was skipped
    assert_eq!(emu.regs.get(Reg::new(5)), 0);
}

proptest! {
    #[test]
    fn add_sets_carry_when_sum_overflows(a in any::<u8>(), b in any::<u8>()) {
        let mut emu = boot(&[
            OpCodes::SetRegister(Reg::new(1), a),
            OpCodes::SetRegister(Reg::new(2), b),
            OpCodes::Add(Reg::new(1), Reg::new(2)),
        ]);
        for _ in 0..3 {
            emu.step().unwrap();
        }
        let sum = a as u16 + b as u16;
        prop_assert_eq!(emu.regs.get(Reg::new(1)), (sum % 256) as u8);
        prop_assert_eq!(emu.regs.get(Reg::VF), (sum > 255) as u8);
    }

    #[test]
    fn subtract_sets_flag_without_borrow(a in any::<u8>(), b in any::<u8>()) {
        let mut emu = boot(&[
            OpCodes::SetRegister(Reg::new(1), a),
            OpCodes::SetRegister(Reg::new(2), b),
            OpCodes::SubtractForward(Reg::new(1), Reg::new(2)),
        ]);
        for _ in 0..3 {
            emu.step().unwrap();
        }
        prop_assert_eq!(emu.regs.get(Reg::new(1)), a.wrapping_sub(b));
        prop_assert_eq!(emu.regs.get(Reg::VF), (a > b) as u8);
    }

    #[test]
    fn bulk_store_then_load_restores_registers(
        values in proptest::collection::vec(any::<u8>(), 16),
        x in 0u8..16,
        base in 0x300u16..0xF00,
    ) {
        let mut program: Vec<OpCodes> = values
            .iter()
            .enumerate()
            .map(|(i, &value)| OpCodes::SetRegister(Reg::new(i as u8), value))
            .collect();
        program.push(OpCodes::SetIndexRegister(base));
        program.push(OpCodes::StoreRegisterToMemory(Reg::new(x)));
        for i in 0..=x {
            program.push(OpCodes::SetRegister(Reg::new(i), 0));
        }
        program.push(OpCodes::LoadRegisterFromMemory(Reg::new(x)));

        let steps = program.len();
        let mut emu = boot(&program);
        for _ in 0..steps {
            emu.step().unwrap();
        }
        prop_assert_eq!(emu.regs.as_slice(), values.as_slice());
        prop_assert_eq!(emu.index.0, base);
    }
}
