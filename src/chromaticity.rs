use serde::Serialize;

use crate::error::{Result, SpectralError};
use crate::tristimulus::Tristimulus;

/// Below this total energy a spectrum is treated as all-zero: its
/// chromaticity, and therefore its CCT, is undefined.
const MIN_TRISTIMULUS_SUM: f64 = 1e-9;

const MIN_UV_DENOMINATOR: f64 = 1e-9;

/// Perceptual chromaticity coordinates derived from tristimulus values:
/// CIE 1931 (x, y) and CIE 1960 UCS (u, v). Luminance is divided out, so
/// these locate a color independent of brightness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Chromaticity {
    pub x: f64,
    pub y: f64,
    pub u: f64,
    pub v: f64,
}

impl Chromaticity {
    /// Project tristimulus values into (x, y) and (u, v).
    ///
    /// Domain errors: a (near-)zero X+Y+Z means the spectrum carried no
    /// energy under the observer; a zero u/v denominator is a degenerate
    /// chromaticity. Both are surfaced, never returned as NaN.
    pub fn from_tristimulus(t: &Tristimulus) -> Result<Self> {
        let sum = t.sum();
        if !sum.is_finite() || sum <= MIN_TRISTIMULUS_SUM {
            return Err(SpectralError::DegenerateSpectrum(sum));
        }

        let x = t.x / sum;
        let y = t.y / sum;

        let denom = -2.0 * x + 12.0 * y + 3.0;
        if denom.abs() < MIN_UV_DENOMINATOR {
            return Err(SpectralError::DegenerateChromaticity(denom));
        }

        Ok(Self {
            x,
            y,
            u: 4.0 * x / denom,
            v: 9.0 * y / denom,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_tristimulus_gives_equal_energy_point() {
        let t = Tristimulus {
            x: 1.0,
            y: 1.0,
            z: 1.0,
        };
        let c = Chromaticity::from_tristimulus(&t).unwrap();
        assert!((c.x - 1.0 / 3.0).abs() < 1e-12);
        assert!((c.y - 1.0 / 3.0).abs() < 1e-12);
        // u = (4/3) / (-2/3 + 4 + 3), v = 3 / (-2/3 + 4 + 3)
        assert!((c.u - 4.0 / 19.0).abs() < 1e-12);
        assert!((c.v - 9.0 / 19.0).abs() < 1e-12);
    }

    #[test]
    fn coordinates_stay_in_unit_range_for_physical_input() {
        let t = Tristimulus {
            x: 10.7,
            y: 10.7,
            z: 10.7,
        };
        let c = Chromaticity::from_tristimulus(&t).unwrap();
        for value in [c.x, c.y, c.u, c.v] {
            assert!((0.0..=1.0).contains(&value), "out of range: {value}");
        }
    }

    #[test]
    fn zero_sum_is_rejected() {
        let t = Tristimulus {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        };
        assert!(matches!(
            Chromaticity::from_tristimulus(&t),
            Err(SpectralError::DegenerateSpectrum(_))
        ));
    }

    #[test]
    fn near_zero_sum_is_rejected() {
        let t = Tristimulus {
            x: 1e-12,
            y: 1e-12,
            z: 1e-12,
        };
        assert!(matches!(
            Chromaticity::from_tristimulus(&t),
            Err(SpectralError::DegenerateSpectrum(_))
        ));
    }

    #[test]
    fn chromaticity_is_scale_invariant() {
        let t1 = Tristimulus {
            x: 2.0,
            y: 3.0,
            z: 1.0,
        };
        let t2 = Tristimulus {
            x: 20.0,
            y: 30.0,
            z: 10.0,
        };
        let c1 = Chromaticity::from_tristimulus(&t1).unwrap();
        let c2 = Chromaticity::from_tristimulus(&t2).unwrap();
        assert!((c1.x - c2.x).abs() < 1e-12);
        assert!((c1.u - c2.u).abs() < 1e-12);
    }
}
