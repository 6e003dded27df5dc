// Separately:
// CPU: 700 times per second by default
// Display: 60 times per second
// Timer: 60 times per second

pub const DEFAULT_INSTRUCTIONS_PER_SECOND: u32 = 700;
pub const DEFAULT_SCALE: u8 = 16;
pub const DEFAULT_FOREGROUND: u32 = 0x00_7F_FF;
pub const DEFAULT_BACKGROUND: u32 = 0x00_00_00;

/// Runtime knobs for the windowed driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub instructions_per_second: u32,
    /// Window pixels per framebuffer pixel: 1, 2, 4, 8, 16 or 32.
    pub scale: u8,
    pub foreground: u32,
    pub background: u32,
    pub mute: bool,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instructions_per_second: DEFAULT_INSTRUCTIONS_PER_SECOND,
            scale: DEFAULT_SCALE,
            foreground: DEFAULT_FOREGROUND,
            background: DEFAULT_BACKGROUND,
            mute: false,
            seed: None,
        }
    }
}

pub fn from_u8_rgb(r: u8, g: u8, b: u8) -> u32 {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    (r << 16) | (g << 8) | b
}

/// Parse `RRGGBB`, with or without a leading `#` or `0x`.
pub fn parse_color(s: &str) -> Result<u32, String> {
    let hex = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(format!("expected six hex digits, got '{s}'"));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| format!("bad colour '{s}': {e}"))
    };
    Ok(from_u8_rgb(channel(0)?, channel(2)?, channel(4)?))
}

pub fn parse_scale(s: &str) -> Result<u8, String> {
    match s.parse::<u8>() {
        Ok(scale @ (1 | 2 | 4 | 8 | 16 | 32)) => Ok(scale),
        _ => Err(format!("scale must be one of 1, 2, 4, 8, 16, 32, got '{s}'")),
    }
}
