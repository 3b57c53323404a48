//! Run options: sizing, border, seed and colour overrides.

use serde::{Deserialize, Serialize};

use crate::{Hsv, SketchError, SketchResult};

/// Largest pixel width or height a run may request.
pub const MAX_PIXEL_SIDE: u32 = 16_384;

/// Border width specification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Border {
    /// Fraction of the shorter pixel side, `0.0..0.5`.
    Fraction(f64),
    /// Absolute width in logical units, scaled by dpi.
    Absolute {
        /// Width in logical units.
        cm: f64,
    },
}

impl Default for Border {
    fn default() -> Self {
        Self::Fraction(0.0)
    }
}

/// Options for one drawable run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    /// Width in logical units.
    pub width: f64,
    /// Height in logical units.
    pub height: f64,
    /// Pixels per logical unit.
    pub dpi: f64,
    /// Border clipped off every tick.
    pub border: Border,
    /// Fixed seed; generated when absent.
    pub seed: Option<u32>,
    /// Use the neutral reference palette instead of choosing one.
    pub neutral: bool,
    /// Render the `#<seed>` caption when the queue drains.
    pub caption: bool,
    /// Background override.
    pub background: Option<Hsv>,
    /// Foreground override.
    pub foreground: Option<Hsv>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 10.0,
            dpi: 100.0,
            border: Border::default(),
            seed: None,
            neutral: false,
            caption: false,
            background: None,
            foreground: None,
        }
    }
}

impl RunOptions {
    /// Options for an exact pixel size (dpi 1).
    #[must_use]
    pub fn pixels(width: u32, height: u32) -> Self {
        Self {
            width: f64::from(width),
            height: f64::from(height),
            dpi: 1.0,
            ..Self::default()
        }
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the border.
    #[must_use]
    pub fn with_border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    /// Parse options from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the options are invalid.
    pub fn from_json(json: &str) -> SketchResult<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check sizing and border values.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::InvalidOptions`] describing the first problem.
    pub fn validate(&self) -> SketchResult<()> {
        for (name, value) in [("width", self.width), ("height", self.height), ("dpi", self.dpi)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SketchError::InvalidOptions(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        for (name, units) in [("width", self.width), ("height", self.height)] {
            let px = (units * self.dpi).round();
            if px < 1.0 {
                return Err(SketchError::InvalidOptions(format!(
                    "{name} rounds to zero pixels"
                )));
            }
            if px > f64::from(MAX_PIXEL_SIDE) {
                return Err(SketchError::InvalidOptions(format!(
                    "{name} of {px} pixels exceeds the maximum of {MAX_PIXEL_SIDE}"
                )));
            }
        }
        match self.border {
            Border::Fraction(f) if !(0.0..0.5).contains(&f) => Err(SketchError::InvalidOptions(
                format!("border fraction must be in 0..0.5, got {f}"),
            )),
            Border::Absolute { cm } if !cm.is_finite() || cm < 0.0 => Err(
                SketchError::InvalidOptions(format!("border_cm must be non-negative, got {cm}")),
            ),
            _ => Ok(()),
        }
    }

    /// Pixel dimensions, `round(units * dpi)`.
    ///
    /// Only meaningful for options that pass [`RunOptions::validate`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pixel_size(&self) -> (u32, u32) {
        let px = |units: f64| (units * self.dpi).round().max(0.0) as u32;
        (px(self.width), px(self.height))
    }

    /// Border width in pixels for a canvas of `width` x `height` pixels.
    #[must_use]
    pub fn border_pixels(&self, width: u32, height: u32) -> f64 {
        match self.border {
            Border::Fraction(f) => f * f64::from(width.min(height)),
            Border::Absolute { cm } => cm * self.dpi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RunOptions::default();
        assert_eq!(options.pixel_size(), (1000, 1000));
        assert!(options.validate().is_ok());
        assert!((options.border_pixels(1000, 1000)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fractional_border() {
        let options = RunOptions::pixels(100, 100).with_border(Border::Fraction(0.1));
        assert!((options.border_pixels(100, 100) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_absolute_border() {
        let options = RunOptions {
            dpi: 50.0,
            border: Border::Absolute { cm: 0.5 },
            ..RunOptions::default()
        };
        assert!((options.border_pixels(500, 500) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_options() {
        let bad = RunOptions {
            dpi: 0.0,
            ..RunOptions::default()
        };
        assert!(matches!(bad.validate(), Err(SketchError::InvalidOptions(_))));

        let bad = RunOptions::default().with_border(Border::Fraction(0.5));
        assert!(matches!(bad.validate(), Err(SketchError::InvalidOptions(_))));
    }

    #[test]
    fn test_oversized_canvas_rejected() {
        let huge = RunOptions::pixels(600_000_000, 2);
        assert!(matches!(huge.validate(), Err(SketchError::InvalidOptions(_))));

        let huge = RunOptions {
            width: 1e12,
            ..RunOptions::default()
        };
        assert!(matches!(huge.validate(), Err(SketchError::InvalidOptions(_))));

        assert!(RunOptions::pixels(MAX_PIXEL_SIDE, 1).validate().is_ok());
        assert!(RunOptions::pixels(MAX_PIXEL_SIDE + 1, 1).validate().is_err());
    }

    #[test]
    fn test_from_json() {
        let options = RunOptions::from_json(
            r#"{"width": 4, "height": 3, "dpi": 10, "seed": 7, "border": {"fraction": 0.05}}"#,
        )
        .expect("parse");
        assert_eq!(options.pixel_size(), (40, 30));
        assert_eq!(options.seed, Some(7));
        assert_eq!(options.border, Border::Fraction(0.05));
        assert!(!options.caption);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        let result = RunOptions::from_json(r#"{"width": -1}"#);
        assert!(matches!(result, Err(SketchError::InvalidOptions(_))));
    }
}
