//! Palettes and contrast-based colour selection.

use serde::{Deserialize, Serialize};

use crate::{Hsv, SketchError, SketchResult, SketchRng};

/// An ordered sequence of colours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(Vec<Hsv>);

impl Palette {
    /// Create a palette from colours.
    #[must_use]
    pub fn new(colours: Vec<Hsv>) -> Self {
        Self(colours)
    }

    /// The fixed reference palette used when a run asks for neutral colours.
    #[must_use]
    pub fn neutral() -> Self {
        Self(vec![
            Hsv::new(0.0, 0.0, 96.0),
            Hsv::new(0.0, 0.0, 8.0),
            Hsv::new(0.0, 0.0, 50.0),
            Hsv::new(0.0, 0.0, 75.0),
        ])
    }

    /// Colours in order.
    #[must_use]
    pub fn colours(&self) -> &[Hsv] {
        &self.0
    }

    /// Colour at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Hsv> {
        self.0.get(index).copied()
    }

    /// Number of colours.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the palette has no colours.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of the colour with the highest contrast against `reference`.
    ///
    /// Ties resolve to the earliest entry. Returns `None` for an empty palette.
    #[must_use]
    pub fn best_contrast(&self, reference: Hsv) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, colour) in self.0.iter().enumerate() {
            let score = colour.contrast(reference);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((i, score));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Rank the palette for a background/foreground pairing.
    ///
    /// The background is the colour with the highest mean contrast against
    /// every other entry; the remaining colours follow in descending contrast
    /// against it. Both steps are stable on ties.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn rank_contrast(&self) -> Option<ContrastRanking> {
        let n = self.0.len();
        let mut best: Option<(usize, f64)> = None;
        for (i, candidate) in self.0.iter().enumerate() {
            let mean = if n > 1 {
                self.0
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, other)| candidate.contrast(*other))
                    .sum::<f64>()
                    / (n - 1) as f64
            } else {
                0.0
            };
            if best.map_or(true, |(_, m)| mean > m) {
                best = Some((i, mean));
            }
        }

        let (bg_index, _) = best?;
        let bg = self.0[bg_index];
        let mut fgs: Vec<Hsv> = self
            .0
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != bg_index)
            .map(|(_, c)| *c)
            .collect();
        fgs.sort_by(|a, b| b.contrast(bg).total_cmp(&a.contrast(bg)));

        Some(ContrastRanking { bg, fgs })
    }
}

impl From<Vec<Hsv>> for Palette {
    fn from(colours: Vec<Hsv>) -> Self {
        Self(colours)
    }
}

/// A background colour and the remaining colours ordered by contrast against it.
#[derive(Debug, Clone, PartialEq)]
pub struct ContrastRanking {
    /// The chosen background.
    pub bg: Hsv,
    /// Foreground candidates, highest contrast first.
    pub fgs: Vec<Hsv>,
}

/// The candidate palettes a drawable picks from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaletteSet(Vec<Palette>);

impl PaletteSet {
    /// Create a palette set, rejecting empty sets and empty palettes.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::EmptyPalette`] if the set or any palette is empty.
    pub fn new(palettes: Vec<Palette>) -> SketchResult<Self> {
        if palettes.is_empty() {
            return Err(SketchError::EmptyPalette("palette set has no palettes".into()));
        }
        if let Some(i) = palettes.iter().position(Palette::is_empty) {
            return Err(SketchError::EmptyPalette(format!("palette {i} has no colours")));
        }
        Ok(Self(palettes))
    }

    /// Parse a palette set from JSON: an array of arrays of `[h, s, v]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or describes an empty set.
    pub fn from_json(json: &str) -> SketchResult<Self> {
        let palettes: Vec<Palette> = serde_json::from_str(json)?;
        Self::new(palettes)
    }

    /// Serialize the set to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> SketchResult<String> {
        serde_json::to_string(self).map_err(SketchError::Serialization)
    }

    /// All palettes.
    #[must_use]
    pub fn palettes(&self) -> &[Palette] {
        &self.0
    }

    /// Number of palettes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set holds no palettes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pick one palette: shuffle a copy of the set, take the first.
    #[must_use]
    pub fn choose(&self, rng: &mut SketchRng) -> Option<Palette> {
        let mut candidates = self.0.clone();
        rng.shuffle(&mut candidates);
        candidates.into_iter().next()
    }
}

impl Default for PaletteSet {
    /// A small built-in collection.
    fn default() -> Self {
        let p = |cs: &[[f64; 3]]| Palette::new(cs.iter().copied().map(Hsv::from).collect());
        Self(vec![
            p(&[[40.0, 12.0, 96.0], [210.0, 60.0, 30.0], [12.0, 75.0, 88.0], [190.0, 40.0, 70.0]]),
            p(&[[220.0, 40.0, 15.0], [45.0, 80.0, 95.0], [350.0, 65.0, 85.0], [170.0, 50.0, 75.0]]),
            p(&[[60.0, 8.0, 94.0], [0.0, 0.0, 12.0], [200.0, 70.0, 60.0], [30.0, 70.0, 80.0], [140.0, 35.0, 55.0]]),
            p(&[[260.0, 35.0, 22.0], [300.0, 30.0, 90.0], [180.0, 60.0, 85.0], [50.0, 55.0, 98.0]]),
        ])
    }
}
