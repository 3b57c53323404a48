//! Seeded 2D/3D simplex noise.
//!
//! The permutation table is drawn from the run's [`SketchRng`], so two runs
//! with the same seed sample identical fields. Output lies in roughly `[-1, 1]`.

use crate::SketchRng;

const GRAD3: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

const F2: f64 = 0.366_025_403_784_438_6; // (sqrt(3) - 1) / 2
const G2: f64 = 0.211_324_865_405_187_1; // (3 - sqrt(3)) / 6
const F3: f64 = 1.0 / 3.0;
const G3: f64 = 1.0 / 6.0;

/// A simplex noise field.
#[derive(Debug, Clone)]
pub struct SimplexNoise {
    perm: [u8; 512],
}

impl SimplexNoise {
    /// Build a field whose permutation is drawn from `rng`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(rng: &mut SketchRng) -> Self {
        let mut base: Vec<u8> = (0..=255u16).map(|i| i as u8).collect();
        rng.shuffle(&mut base);
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = base[i & 255];
        }
        Self { perm }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn hash(&self, i: i64) -> usize {
        usize::from(self.perm[(i & 511) as usize])
    }

    /// Sample the 2D field.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::similar_names)]
    pub fn noise2(&self, x: f64, y: f64) -> f64 {
        let s = (x + y) * F2;
        let i = (x + s).floor() as i64;
        let j = (y + s).floor() as i64;
        #[allow(clippy::cast_precision_loss)]
        let t = (i + j) as f64 * G2;
        #[allow(clippy::cast_precision_loss)]
        let (x0, y0) = (x - (i as f64 - t), y - (j as f64 - t));

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };
        #[allow(clippy::cast_precision_loss)]
        let (x1, y1) = (x0 - i1 as f64 + G2, y0 - j1 as f64 + G2);
        let (x2, y2) = (x0 - 1.0 + 2.0 * G2, y0 - 1.0 + 2.0 * G2);

        let ii = i & 255;
        let jj = j & 255;
        let gi0 = self.hash(ii + self.hash(jj) as i64) % 12;
        let gi1 = self.hash(ii + i1 + self.hash(jj + j1) as i64) % 12;
        let gi2 = self.hash(ii + 1 + self.hash(jj + 1) as i64) % 12;

        let corner = |g: usize, x: f64, y: f64| {
            let t = 0.5 - x * x - y * y;
            if t < 0.0 {
                0.0
            } else {
                let t = t * t;
                t * t * (GRAD3[g][0] * x + GRAD3[g][1] * y)
            }
        };

        70.0 * (corner(gi0, x0, y0) + corner(gi1, x1, y1) + corner(gi2, x2, y2))
    }

    /// Sample the 3D field.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::similar_names,
        clippy::many_single_char_names
    )]
    pub fn noise3(&self, x: f64, y: f64, z: f64) -> f64 {
        let s = (x + y + z) * F3;
        let i = (x + s).floor() as i64;
        let j = (y + s).floor() as i64;
        let k = (z + s).floor() as i64;
        let t = (i + j + k) as f64 * G3;
        let x0 = x - (i as f64 - t);
        let y0 = y - (j as f64 - t);
        let z0 = z - (k as f64 - t);

        let (i1, j1, k1, i2, j2, k2) = if x0 >= y0 {
            if y0 >= z0 {
                (1, 0, 0, 1, 1, 0)
            } else if x0 >= z0 {
                (1, 0, 0, 1, 0, 1)
            } else {
                (0, 0, 1, 1, 0, 1)
            }
        } else if y0 < z0 {
            (0, 0, 1, 0, 1, 1)
        } else if x0 < z0 {
            (0, 1, 0, 0, 1, 1)
        } else {
            (0, 1, 0, 1, 1, 0)
        };

        let x1 = x0 - i1 as f64 + G3;
        let y1 = y0 - j1 as f64 + G3;
        let z1 = z0 - k1 as f64 + G3;
        let x2 = x0 - i2 as f64 + 2.0 * G3;
        let y2 = y0 - j2 as f64 + 2.0 * G3;
        let z2 = z0 - k2 as f64 + 2.0 * G3;
        let x3 = x0 - 1.0 + 3.0 * G3;
        let y3 = y0 - 1.0 + 3.0 * G3;
        let z3 = z0 - 1.0 + 3.0 * G3;

        let ii = i & 255;
        let jj = j & 255;
        let kk = k & 255;
        let h = |di: i64, dj: i64, dk: i64| {
            let inner = self.hash(kk + dk) as i64;
            let mid = self.hash(jj + dj + inner) as i64;
            self.hash(ii + di + mid) % 12
        };
        let gi0 = h(0, 0, 0);
        let gi1 = h(i1, j1, k1);
        let gi2 = h(i2, j2, k2);
        let gi3 = h(1, 1, 1);

        let corner = |g: usize, x: f64, y: f64, z: f64| {
            let t = 0.6 - x * x - y * y - z * z;
            if t < 0.0 {
                0.0
            } else {
                let t = t * t;
                t * t * (GRAD3[g][0] * x + GRAD3[g][1] * y + GRAD3[g][2] * z)
            }
        };

        32.0 * (corner(gi0, x0, y0, z0)
            + corner(gi1, x1, y1, z1)
            + corner(gi2, x2, y2, z2)
            + corner(gi3, x3, y3, z3))
    }
}
