use statrs::function::erf::erf;
use std::f64::consts::SQRT_2;
use crate::constants::{L_ZERO_TOLERANCE, SD_LEVELS};
use crate::models::{Lms, SdReference};

impl Lms {
    /// Standard deviation score of `value`.
    ///
    /// `z = ((value / M)^L - 1) / (L * S)`, or `ln(value / M) / S` when L is zero.
    pub fn z_score(&self, value: f64) -> f64 {
        let ratio = value / self.m;
        if self.l.abs() < L_ZERO_TOLERANCE {
            ratio.ln() / self.s
        } else {
            (ratio.powf(self.l) - 1.0) / (self.l * self.s)
        }
    }

    /// Inverse of [`Lms::z_score`]. `None` when the power transform has no
    /// positive finite solution for `z`.
    pub fn value_at_z(&self, z: f64) -> Option<f64> {
        let value = if self.l.abs() < L_ZERO_TOLERANCE {
            self.m * (self.s * z).exp()
        } else {
            let base = 1.0 + self.l * self.s * z;
            if base <= 0.0 {
                return None;
            }
            self.m * base.powf(1.0 / self.l)
        };

        (value.is_finite() && value > 0.0).then_some(value)
    }

    /// Linear interpolation of each parameter, `fraction` in [0, 1].
    pub fn interpolate(&self, upper: &Lms, fraction: f64) -> Lms {
        Lms {
            l: lerp(self.l, upper.l, fraction),
            m: lerp(self.m, upper.m, fraction),
            s: lerp(self.s, upper.s, fraction),
        }
    }

    /// SD reference points scaled back from the parameters. A level the
    /// transform cannot reach collapses to 0 below the median and to
    /// infinity above it, which keeps the points ordered.
    pub fn sd_reference(&self) -> SdReference {
        let mut points = [0.0; 7];
        for (point, &level) in points.iter_mut().zip(SD_LEVELS.iter()) {
            let z = level as f64;
            *point = self.value_at_z(z).unwrap_or(if z < 0.0 { 0.0 } else { f64::INFINITY });
        }
        SdReference::new(points)
    }
}

pub fn lerp(lower: f64, upper: f64, fraction: f64) -> f64 {
    lower + fraction * (upper - lower)
}

/// Standard normal CDF scaled to a 0..100 percentile.
pub fn percentile_from_z(z: f64) -> f64 {
    50.0 * (1.0 + erf(z / SQRT_2))
}
