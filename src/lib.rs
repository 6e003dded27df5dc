// 16 8-bit data registers named V0 to VF
// I -> address register (12 bits)
//
// Stack of 16 return addresses
//
// Delay timer & Sound timer: Count down at 60 times / s until 0
// Beep when sound timer is non-zero
//
// Display res: 64 width, 32 height
//
// 35 opcodes, each are 2 bytes (big-endian)

pub mod config;
pub mod decode;
pub mod display;
pub mod driver;
pub mod emulator;
pub mod error;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod screen;
pub mod sound;
pub mod timer;

pub use emulator::{Emulator, ExecState, Status};
pub use error::{Fault, RunError, VmError};
