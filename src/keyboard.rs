use minifb::Key;

use crate::error::{Result, VmError};

pub const KEY_COUNT: usize = 16;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Keyboard {
    keys: [bool; KEY_COUNT],
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }

    pub fn reset(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    pub fn press(&mut self, code: u8) -> Result<()> {
        *self.slot(code)? = true;
        Ok(())
    }

    pub fn release(&mut self, code: u8) -> Result<()> {
        *self.slot(code)? = false;
        Ok(())
    }

    // codes outside the keypad are never held
    pub fn is_held(&self, code: u8) -> bool {
        self.keys.get(code as usize).copied().unwrap_or(false)
    }

    pub fn held(&self) -> impl Iterator<Item = u8> + '_ {
        (0..KEY_COUNT as u8).filter(|&code| self.keys[code as usize])
    }

    fn slot(&mut self, code: u8) -> Result<&mut bool> {
        self.keys
            .get_mut(code as usize)
            .ok_or(VmError::InvalidKey { code })
    }
}

// Layout of the COSMAC VIP keypad onto the left-hand block of a QWERTY
// keyboard:
//
//   1 2 3 C      1 2 3 4
//   4 5 6 D  ->  Q W E R
//   7 8 9 E      A S D F
//   A 0 B F      Z X C V
pub fn keypad_code(key: Key) -> Option<u8> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xC),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_are_idempotent() {
        let mut kb = Keyboard::new();
        kb.press(0xA).unwrap();
        kb.press(0xA).unwrap();
        assert!(kb.is_held(0xA));
        assert_eq!(kb.held().collect::<Vec<_>>(), vec![0xA]);

        kb.release(0xA).unwrap();
        assert!(!kb.is_held(0xA));
        kb.release(0xA).unwrap();
        kb.release(0x3).unwrap();
        assert_eq!(kb.held().count(), 0);
    }

    #[test]
    fn codes_past_the_keypad_are_rejected() {
        let mut kb = Keyboard::new();
        assert_eq!(kb.press(0x10), Err(VmError::InvalidKey { code: 0x10 }));
        assert_eq!(kb.release(0xFF), Err(VmError::InvalidKey { code: 0xFF }));
        assert!(!kb.is_held(0x10));
    }

    #[test]
    fn keypad_mapping_covers_every_code_once() {
        let keys = [
            Key::Key1,
            Key::Key2,
            Key::Key3,
            Key::Key4,
            Key::Q,
            Key::W,
            Key::E,
            Key::R,
            Key::A,
            Key::S,
            Key::D,
            Key::F,
            Key::Z,
            Key::X,
            Key::C,
            Key::V,
        ];
        let mut codes: Vec<u8> = keys.iter().filter_map(|&k| keypad_code(k)).collect();
        codes.sort_unstable();
        assert_eq!(codes, (0..16).collect::<Vec<u8>>());
        assert_eq!(keypad_code(Key::Escape), None);
    }
}
