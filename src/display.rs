use std::fmt;

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// The 64x32 monochrome surface. Pure bits, no colour; a renderer reads
/// `pixels()` after a draw or clear.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bit_buffer: [bool; WIDTH * HEIGHT],
    dirty: bool,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bit_buffer: [false; WIDTH * HEIGHT],
            dirty: true,
        }
    }

    pub fn clear_buffer(&mut self) {
        self.bit_buffer = [false; WIDTH * HEIGHT];
        self.dirty = true;
    }

    /// XOR `bit` into the pixel at (x, y), wrapping both coordinates.
    /// Returns true when a lit pixel was turned off.
    pub fn plot(&mut self, x: usize, y: usize, bit: bool) -> bool {
        let index = (y % HEIGHT) * WIDTH + (x % WIDTH);
        let previous = self.bit_buffer[index];
        self.bit_buffer[index] = previous ^ bit;
        if bit {
            self.dirty = true;
        }
        previous && bit
    }

    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let mut vf = false;
        for (i, row) in sprite.iter().enumerate() {
            for j in 0..8 {
                let bit = (row >> (7 - j)) & 1 == 1;
                if self.plot(x as usize + j, y as usize + i, bit) {
                    vf = true;
                }
            }
        }
        vf
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bit_buffer[(y % HEIGHT) * WIDTH + (x % WIDTH)]
    }

    pub fn pixels(&self) -> &[bool] {
        &self.bit_buffer
    }

    pub fn is_blank(&self) -> bool {
        self.bit_buffer.iter().all(|px| !px)
    }

    /// Whether anything changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.bit_buffer.chunks(WIDTH) {
            let line: String = row.iter().map(|&px| if px { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
