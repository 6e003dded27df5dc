use crate::error::{Result, VmError};

pub type TypeAddr = u16; // in reality u12
type FontBytes = [u8; 5 * 16];

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: TypeAddr = 0x200;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

pub const FONT_START: usize = 0x000;
pub const FONT_GLYPH_SIZE: usize = 5;

pub const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

pub const FONT_END: usize = FONT_START + DEFAULT_FONT.len();

/// Where the glyph for the low nibble of `digit` starts.
pub fn font_addr(digit: u8) -> TypeAddr {
    (FONT_START + FONT_GLYPH_SIZE * (digit & 0xF) as usize) as TypeAddr
}

#[derive(Debug, Clone)]
pub struct Memory {
    // 4k bytes
    // font data stored from 000 -> 04F, programs from 200
    bytes: [u8; MEMORY_SIZE],
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        let mut mem = Self {
            bytes: [0; MEMORY_SIZE],
        };
        mem.load_font();
        mem
    }

    pub fn get(&self, addr: usize) -> Result<u8> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or(VmError::MemoryOutOfBounds { address: addr })
    }

    pub fn set(&mut self, addr: usize, val: u8) -> Result<()> {
        if (FONT_START..FONT_END).contains(&addr) {
            return Err(VmError::ReservedWrite { address: addr });
        }
        let slot = self
            .bytes
            .get_mut(addr)
            .ok_or(VmError::MemoryOutOfBounds { address: addr })?;
        *slot = val;
        Ok(())
    }

    /// `len` bytes starting at `addr`, all of which must be in range. The
    /// error names the first byte past the end of memory.
    pub fn slice(&self, addr: usize, len: usize) -> Result<&[u8]> {
        if len == 0 {
            return Ok(&[]);
        }
        let end = addr + len;
        if end > MEMORY_SIZE {
            return Err(VmError::MemoryOutOfBounds {
                address: addr.max(MEMORY_SIZE),
            });
        }
        Ok(&self.bytes[addr..end])
    }

    /// Big-endian word at `pc`. Both bytes have to fit inside memory.
    pub fn next_instruction(&self, pc: TypeAddr) -> Result<u16> {
        let pc = pc as usize;
        if pc + 1 >= MEMORY_SIZE {
            let address = if pc >= MEMORY_SIZE { pc } else { pc + 1 };
            return Err(VmError::MemoryOutOfBounds { address });
        }
        let (l, r) = (self.bytes[pc], self.bytes[pc + 1]);
        Ok(((l as u16) << 8) | r as u16)
    }

    /// Zero everything, write the font, then copy the program to 0x200.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(VmError::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        self.bytes = [0; MEMORY_SIZE];
        self.load_font();

        let start_index = PROGRAM_START as usize;
        self.bytes[start_index..start_index + rom.len()].copy_from_slice(rom);
        Ok(())
    }

    fn load_font(&mut self) {
        self.bytes[FONT_START..FONT_END].copy_from_slice(&DEFAULT_FONT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_glyphs_sit_at_five_byte_strides() {
        let mem = Memory::new();
        for digit in 0..16u8 {
            let addr = font_addr(digit) as usize;
            assert_eq!(addr, 5 * digit as usize);
            assert_eq!(
                mem.slice(addr, 5).unwrap(),
                &DEFAULT_FONT[addr..addr + 5],
                "glyph {digit:X}"
            );
        }
        // spot check a couple of known bitmaps
        assert_eq!(mem.slice(0, 5).unwrap(), &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(
            mem.slice(font_addr(0xF) as usize, 5).unwrap(),
            &[0xF0, 0x80, 0xF0, 0x80, 0x80]
        );
    }

    #[test]
    fn load_rom_clears_previous_contents() {
        let mut mem = Memory::new();
        mem.load_rom(&[0xAA; 16]).unwrap();
        mem.set(0xF00, 0x55).unwrap();

        mem.load_rom(&[0x00, 0xE0]).unwrap();
        assert_eq!(mem.slice(0x200, 4).unwrap(), &[0x00, 0xE0, 0x00, 0x00]);
        assert_eq!(mem.get(0xF00), Ok(0));
        assert_eq!(mem.get(0), Ok(0xF0));
    }

    #[test]
    fn rom_that_does_not_fit_is_rejected() {
        let mut mem = Memory::new();
        assert!(mem.load_rom(&vec![0; MAX_ROM_SIZE]).is_ok());
        assert_eq!(
            mem.load_rom(&vec![0; MAX_ROM_SIZE + 1]),
            Err(VmError::RomTooLarge {
                size: MAX_ROM_SIZE + 1,
                max: MAX_ROM_SIZE
            })
        );
    }

    #[test]
    fn read_word_is_big_endian() {
        let mut mem = Memory::new();
        mem.load_rom(&[0x12, 0x34, 0x56]).unwrap();
        assert_eq!(mem.next_instruction(0x200), Ok(0x1234));
        assert_eq!(mem.next_instruction(0x201), Ok(0x3456));
    }

    #[test]
    fn fetch_past_the_end_fails() {
        let mem = Memory::new();
        assert!(mem.next_instruction(0xFFE).is_ok());
        assert_eq!(
            mem.next_instruction(0xFFF),
            Err(VmError::MemoryOutOfBounds { address: 0x1000 })
        );
    }

    #[test]
    fn font_region_is_write_protected() {
        let mut mem = Memory::new();
        assert_eq!(
            mem.set(0x04F, 0),
            Err(VmError::ReservedWrite { address: 0x04F })
        );
        assert!(mem.set(0x050, 1).is_ok());
        assert_eq!(
            mem.set(MEMORY_SIZE, 1),
            Err(VmError::MemoryOutOfBounds {
                address: MEMORY_SIZE
            })
        );
    }

    #[test]
    fn slice_is_bounds_checked() {
        let mem = Memory::new();
        assert!(mem.slice(0xFF0, 16).is_ok());
        assert_eq!(
            mem.slice(0xFF0, 17),
            Err(VmError::MemoryOutOfBounds { address: 0x1000 })
        );
        assert_eq!(
            mem.slice(0x1000, 3),
            Err(VmError::MemoryOutOfBounds { address: 0x1000 })
        );
        assert_eq!(
            mem.slice(0x10FD, 2),
            Err(VmError::MemoryOutOfBounds { address: 0x10FD })
        );
        // nothing is read, so nothing can be out of range
        assert_eq!(mem.slice(0x10FD, 0), Ok(&[][..]));
    }
}
