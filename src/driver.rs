use crate::config::Config;
use crate::emulator::{Emulator, Status};
use crate::error::{Fault, RunError};
use crate::screen::{KeyEvent, Screen};
use crate::sound::Sound;
use crate::timer::{Pacer, TIMER_DEC_PER_SECOND};

/// Open a window and run `rom` until the window closes or the program faults.
pub fn run(emu: &mut Emulator, rom: &[u8], config: &Config) -> Result<(), RunError> {
    emu.load_rom(rom)?;
    let mut screen = Screen::new(config)?;
    let sound = if config.mute {
        None
    } else {
        match Sound::new() {
            Ok(sound) => Some(sound),
            Err(e) => {
                log::warn!("running without sound: {e}");
                None
            }
        }
    };

    let mut cpu = Pacer::new(config.instructions_per_second);
    let mut timers = Pacer::new(TIMER_DEC_PER_SECOND);
    let mut paused = false;

    while screen.is_open() {
        if screen.pause_pressed() {
            paused = !paused;
            log::info!("{}", if paused { "paused" } else { "resumed" });
            cpu.reset();
            timers.reset();
        }
        if screen.reset_pressed() {
            log::info!("reset");
            emu.load_rom(rom)?;
            cpu.reset();
            timers.reset();
        }

        for event in screen.key_events() {
            match event {
                KeyEvent::Down(code) => emu.report_key_down(code)?,
                KeyEvent::Up(code) => emu.report_key_up(code)?,
            }
        }

        if !paused {
            run_frame(emu, cpu.due(), timers.due())?;
        }
        if let Some(sound) = &sound {
            sound.set_active(!paused && emu.sound_active());
        }
        screen.present(emu.take_frame())?;
    }
    Ok(())
}

/// Up to `steps` instructions, then `ticks` timer decrements. Stepping stops
/// early once the program blocks on a key.
pub fn run_frame(emu: &mut Emulator, steps: u32, ticks: u32) -> Result<(), Fault> {
    for _ in 0..steps {
        if emu.step()? == Status::WaitingForKey || emu.is_waiting() {
            break;
        }
    }
    for _ in 0..ticks {
        emu.tick_timers();
    }
    Ok(())
}
