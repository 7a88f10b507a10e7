use serde::Serialize;

use crate::cmf::Observer;
use crate::spd::SpectralDistribution;

/// CIE XYZ tristimulus values: energy integrals of a spectrum against the
/// standard observer curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tristimulus {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Tristimulus {
    pub fn sum(&self) -> f64 {
        self.x + self.y + self.z
    }
}

/// Discrete approximation of the CIE tristimulus integral.
///
/// The observer curves are interpolated onto the spectrum's own wavelength
/// grid (clamped lerp), then X, Y, Z are plain sums of intensity times
/// matching-function value. Summation rather than trapezoidal integration is
/// intentional: in the calling context both grids are equally and densely
/// spaced, so the quadrature weight is a constant that cancels in the
/// chromaticity ratios. Y is returned unscaled, with no normalization by the
/// luminous efficiency integral.
pub fn integrate(spd: &SpectralDistribution, observer: &Observer) -> Tristimulus {
    let mut sum = Tristimulus {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    for (&wl, &intensity) in spd.wavelengths().iter().zip(spd.intensities()) {
        let (x_bar, y_bar, z_bar) = observer.sample(wl);
        sum.x += intensity * x_bar;
        sum.y += intensity * y_bar;
        sum.z += intensity * z_bar;
    }

    sum
}
