//! Bundled demo sketches.

mod rings;
mod scatter;

pub use rings::Rings;
pub use scatter::Scatter;

use crate::sketch::Sketch;

/// Names accepted by [`by_name`].
pub const NAMES: &[&str] = &["scatter", "rings"];

/// Look up a bundled sketch.
#[must_use]
pub fn by_name(name: &str) -> Option<Box<dyn Sketch>> {
    match name {
        "scatter" => Some(Box::new(Scatter::default())),
        "rings" => Some(Box::new(Rings::default())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_round_trip() {
        for name in NAMES {
            let sketch = by_name(name).expect("registered");
            assert_eq!(sketch.name(), *name);
        }
        assert!(by_name("nope").is_none());
    }
}
