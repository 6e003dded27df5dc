use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

use crate::config::Config;
use crate::display::{FrameBuffer, HEIGHT, WIDTH};
use crate::error::RunError;
use crate::keyboard::{keypad_code, KEY_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down(u8),
    Up(u8),
}

/// minifb window that shows the framebuffer and turns host keys into keypad
/// transitions.
pub struct Screen {
    window: Window,
    pixel_buffer: Vec<u32>,
    held: [bool; KEY_COUNT],
    foreground: u32,
    background: u32,
}

impl Screen {
    pub fn new(config: &Config) -> Result<Self, RunError> {
        let mut window = Window::new(
            "chip8-vm - ESC to exit, P to pause, BACKSPACE to reset",
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale: scale_option(config.scale),
                ..WindowOptions::default()
            },
        )?;
        // Limit to max ~60 fps update rate
        window.limit_update_rate(Some(std::time::Duration::from_micros(16600)));
        Ok(Self {
            window,
            pixel_buffer: vec![config.background; WIDTH * HEIGHT],
            held: [false; KEY_COUNT],
            foreground: config.foreground,
            background: config.background,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    pub fn pause_pressed(&self) -> bool {
        self.window.is_key_pressed(Key::P, KeyRepeat::No)
    }

    pub fn reset_pressed(&self) -> bool {
        self.window.is_key_pressed(Key::Backspace, KeyRepeat::No)
    }

    /// Keypad keys that went down or up since the last call.
    pub fn key_events(&mut self) -> Vec<KeyEvent> {
        let pressed = self.window.get_keys().into_iter().filter_map(keypad_code);
        let (held, events) = key_transitions(&self.held, pressed);
        self.held = held;
        events
    }

    /// Repaint when `frame` is given, then hand the buffer to the window.
    /// Called every frame so the window keeps pumping events.
    pub fn present(&mut self, frame: Option<&FrameBuffer>) -> Result<(), RunError> {
        if let Some(fb) = frame {
            render(fb, self.foreground, self.background, &mut self.pixel_buffer);
        }
        self.window
            .update_with_buffer(&self.pixel_buffer, WIDTH, HEIGHT)?;
        Ok(())
    }
}

fn scale_option(scale: u8) -> Scale {
    match scale {
        1 => Scale::X1,
        2 => Scale::X2,
        4 => Scale::X4,
        8 => Scale::X8,
        32 => Scale::X32,
        _ => Scale::X16,
    }
}

pub fn render(fb: &FrameBuffer, foreground: u32, background: u32, out: &mut [u32]) {
    for (px, &bit) in out.iter_mut().zip(fb.pixels()) {
        *px = if bit { foreground } else { background };
    }
}

pub fn key_transitions(
    previous: &[bool; KEY_COUNT],
    pressed: impl Iterator<Item = u8>,
) -> ([bool; KEY_COUNT], Vec<KeyEvent>) {
    let mut now = [false; KEY_COUNT];
    for code in pressed {
        now[code as usize & 0xF] = true;
    }
    let events = (0..KEY_COUNT)
        .filter(|&code| now[code] != previous[code])
        .map(|code| {
            if now[code] {
                KeyEvent::Down(code as u8)
            } else {
                KeyEvent::Up(code as u8)
            }
        })
        .collect();
    (now, events)
}
