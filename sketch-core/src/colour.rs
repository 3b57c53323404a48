//! HSV colours, RGB conversion and WCAG contrast.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{SketchError, SketchResult};

/// A colour in HSV space: hue 0–360, saturation and value 0–100.
///
/// Serialized as a `[h, s, v]` triple, the palette file format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Hsv {
    /// Hue in degrees.
    pub h: f64,
    /// Saturation, 0–100.
    pub s: f64,
    /// Value, 0–100.
    pub v: f64,
}

impl Hsv {
    /// Pure white.
    pub const WHITE: Self = Self::new(0.0, 0.0, 100.0);
    /// Pure black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a colour from its components.
    #[must_use]
    pub const fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }

    /// Convert to 8-bit sRGB channels.
    #[must_use]
    #[allow(clippy::many_single_char_names)]
    pub fn to_rgb8(self) -> [u8; 3] {
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let v = (self.v / 100.0).clamp(0.0, 1.0);
        let c = v * s;
        let hp = self.h.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
        let (r, g, b) = match hp {
            h if h < 1.0 => (c, x, 0.0),
            h if h < 2.0 => (x, c, 0.0),
            h if h < 3.0 => (0.0, c, x),
            h if h < 4.0 => (0.0, x, c),
            h if h < 5.0 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = v - c;
        [to_byte(r + m), to_byte(g + m), to_byte(b + m)]
    }

    /// Convert to a renderable colour with the given opacity.
    #[must_use]
    pub fn to_rgba(self, alpha: f32) -> Rgba {
        let [r, g, b] = self.to_rgb8();
        Rgba {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
            a: alpha.clamp(0.0, 1.0),
        }
    }

    /// Convert from 8-bit sRGB channels.
    #[must_use]
    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        let [r, g, b] = rgb.map(|c| f64::from(c) / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let h = if delta == 0.0 {
            0.0
        } else if (max - r).abs() < f64::EPSILON {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if (max - g).abs() < f64::EPSILON {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let s = if max == 0.0 { 0.0 } else { delta / max };

        Self::new(h, s * 100.0, max * 100.0)
    }

    /// Relative luminance per WCAG 2.x.
    #[must_use]
    pub fn luminance(self) -> f64 {
        let [r, g, b] = self.to_rgb8().map(|c| {
            let c = f64::from(c) / 255.0;
            if c <= 0.039_28 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        });
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }

    /// Contrast ratio against another colour, 1.0 (none) to 21.0 (black on white).
    #[must_use]
    pub fn contrast(self, other: Self) -> f64 {
        let a = self.luminance();
        let b = other.luminance();
        let (light, dark) = if a >= b { (a, b) } else { (b, a) };
        (light + 0.05) / (dark + 0.05)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_byte(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl From<[f64; 3]> for Hsv {
    fn from([h, s, v]: [f64; 3]) -> Self {
        Self::new(h, s, v)
    }
}

impl From<Hsv> for [f64; 3] {
    fn from(c: Hsv) -> Self {
        [c.h, c.s, c.v]
    }
}

impl FromStr for Hsv {
    type Err = SketchError;

    /// Parse `#rrggbb` (leading `#` optional).
    fn from_str(s: &str) -> SketchResult<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        let invalid = || SketchError::InvalidOptions(format!("invalid hex colour '{s}'"));
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::from_rgb8([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl fmt::Display for Hsv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.to_rgb8();
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// A renderable colour with straight (non-premultiplied) alpha, channels 0–1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Return the same colour with a different alpha.
    #[must_use]
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }
}

impl From<Hsv> for Rgba {
    fn from(c: Hsv) -> Self {
        c.to_rgba(1.0)
    }
}
