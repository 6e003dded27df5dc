use std::fmt;

use thiserror::Error;

use crate::emulator::Trace;
use crate::registers::STACK_DEPTH;

/// Conditions that stop the interpreter. None of these are retried: the only
/// way back to a runnable machine is loading a program again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    #[error("memory access out of bounds at address {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("write into the reserved font region at address {address:#06X}")]
    ReservedWrite { address: usize },

    #[error("stack overflow: more than {} nested calls", STACK_DEPTH)]
    StackOverflow,

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("unknown opcode {opcode:#06X}")]
    UnknownOpcode { opcode: u16 },

    #[error("rom is too large ({size} bytes), at most {max} bytes fit")]
    RomTooLarge { size: usize, max: usize },

    #[error("key code {code:#04X} is not on the keypad")]
    InvalidKey { code: u8 },
}

/// A fatal error together with the step that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct Fault {
    pub trace: Trace,
    #[source]
    pub source: VmError,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "halted at {}: {}", self.trace, self.source)
    }
}

/// Errors surfaced by the windowed driver.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Fault(#[from] Fault),

    #[error(transparent)]
    Vm(#[from] VmError),

    #[error("window error: {0}")]
    Window(#[from] minifb::Error),

    #[error("no audio output device available")]
    NoOutputDevice,

    #[error("unsupported sample format '{0}'")]
    UnsupportedSampleFormat(String),

    #[error("audio configuration error: {0}")]
    AudioConfig(#[from] cpal::SupportedStreamConfigsError),

    #[error("audio stream error: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("audio playback error: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

pub type Result<T> = std::result::Result<T, VmError>;
