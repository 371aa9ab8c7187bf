//! Color math for style adjustment.

/// A CSS color string (e.g., "#FF0000").
pub type CssColor = String;

/// RGB color with u8 components.
///
/// Used for luminance checks and lightening/darkening without repeated
/// string parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`, `#RGB` or `#AARRGGBB` (alpha ignored), `#` optional.
    pub fn from_hex(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let channel = |range: std::ops::Range<usize>| -> Option<u8> {
            u8::from_str_radix(hex.get(range)?, 16).ok()
        };
        match hex.len() {
            3 => {
                let short = |i: usize| channel(i..i + 1).map(|v| v * 17);
                Some(Self::new(short(0)?, short(1)?, short(2)?))
            }
            6 => Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Some(Self::new(channel(2..4)?, channel(4..6)?, channel(6..8)?)),
            _ => None,
        }
    }

    /// `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Blend toward white. 0.0 = no change, 1.0 = white.
    pub fn lighten(self, factor: f64) -> Self {
        Self {
            r: blend_component(self.r, 255, factor),
            g: blend_component(self.g, 255, factor),
            b: blend_component(self.b, 255, factor),
        }
    }

    /// Blend toward black. 0.0 = no change, 1.0 = black.
    pub fn darken(self, factor: f64) -> Self {
        Self {
            r: blend_component(self.r, 0, factor),
            g: blend_component(self.g, 0, factor),
            b: blend_component(self.b, 0, factor),
        }
    }

    /// Perceived luminance in `[0, 1]` (0.299 R + 0.587 G + 0.114 B).
    pub fn luminance(self) -> f64 {
        let r = f64::from(self.r);
        let g = f64::from(self.g);
        let b = f64::from(self.b);
        (0.299 * r + 0.587 * g + 0.114 * b) / 255.0
    }

    pub fn is_light(self) -> bool {
        self.luminance() > 0.5
    }
}

/// The cast is safe because the value is clamped to [0, 255] first.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend_component(from: u8, to: u8, factor: f64) -> u8 {
    let from = f64::from(from);
    let to = f64::from(to);
    let blended = from + (to - from) * factor.clamp(0.0, 1.0);
    blended.clamp(0.0, 255.0).round() as u8
}

/// Theme defaults for cells without explicit colors.
pub mod palette {
    pub const LIGHT_TEXT: &str = "#000000";
    pub const LIGHT_BACKGROUND: &str = "#FFFFFF";
    pub const LIGHT_GRID_LINE: &str = "#E0E0E0";

    pub const DARK_TEXT: &str = "#E8EAED";
    pub const DARK_BACKGROUND: &str = "#202124";
    pub const DARK_GRID_LINE: &str = "#3C4043";
}
