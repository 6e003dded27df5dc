use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use chip8_vm::config::{self, Config};
use chip8_vm::{driver, Emulator};

/// Run a CHIP-8 program in a window.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// ROM image to load at 0x200
    rom: PathBuf,

    /// Instructions executed per second
    #[arg(long, default_value_t = config::DEFAULT_INSTRUCTIONS_PER_SECOND)]
    ips: u32,

    /// Window pixels per display pixel (1, 2, 4, 8, 16 or 32)
    #[arg(long, default_value_t = config::DEFAULT_SCALE, value_parser = config::parse_scale)]
    scale: u8,

    /// Foreground colour as RRGGBB
    #[arg(long, default_value = "007FFF", value_parser = config::parse_color)]
    fg: u32,

    /// Background colour as RRGGBB
    #[arg(long, default_value = "000000", value_parser = config::parse_color)]
    bg: u32,

    /// Do not open an audio stream
    #[arg(long)]
    mute: bool,

    /// Seed for the random number instruction
    #[arg(long)]
    seed: Option<u64>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            instructions_per_second: args.ips,
            scale: args.scale,
            foreground: args.fg,
            background: args.bg,
            mute: args.mute,
            seed: args.seed,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let rom_path = args.rom.clone();
    let rom = std::fs::read(&rom_path)
        .with_context(|| format!("failed to read rom {}", rom_path.display()))?;
    let config = Config::from(args);

    let mut emu = match config.seed {
        Some(seed) => Emulator::with_seed(seed),
        None => Emulator::new(),
    };

    if let Err(e) = driver::run(&mut emu, &rom, &config) {
        log::error!("{e}");
        return Err(e).with_context(|| format!("while running {}", rom_path.display()));
    }
    Ok(())
}
