use serde::Serialize;

use crate::error::{Result, SpectralError};

/// Inclusive bounds of the common comparison grid, in integer nanometers.
pub const GRID_MIN_NM: u32 = 300;
pub const GRID_MAX_NM: u32 = 830;

/// Wavelength at which resampled spectra are normalized to unit intensity.
pub const REFERENCE_NM: u32 = 560;

const REFERENCE_EPSILON: f64 = 1e-12;

/// A measured or synthesized spectral power distribution: intensity as a
/// function of wavelength, with no constraint on native sampling density.
///
/// Invariants, enforced at construction: at least 2 points, strictly
/// increasing wavelengths (duplicates rejected), all values finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectralDistribution {
    wavelengths: Vec<f64>,
    intensities: Vec<f64>,
}

impl SpectralDistribution {
    /// Build from `(wavelength_nm, intensity)` pairs.
    pub fn from_points(points: &[(f64, f64)]) -> Result<Self> {
        let (wavelengths, intensities) = points.iter().copied().unzip();
        Self::from_columns(wavelengths, intensities)
    }

    /// Build from parallel wavelength/intensity columns.
    pub fn from_columns(wavelengths: Vec<f64>, intensities: Vec<f64>) -> Result<Self> {
        if wavelengths.len() != intensities.len() {
            return Err(SpectralError::MismatchedColumns {
                wavelengths: wavelengths.len(),
                intensities: intensities.len(),
            });
        }
        let n = wavelengths.len();
        if n < 2 {
            return Err(SpectralError::TooFewPoints(n));
        }

        for i in 0..n {
            if !wavelengths[i].is_finite() || !intensities[i].is_finite() {
                return Err(SpectralError::NonFiniteValue(i));
            }
        }
        for i in 1..n {
            if wavelengths[i] <= wavelengths[i - 1] {
                return Err(SpectralError::NonMonotonicWavelengths {
                    index: i,
                    prev: wavelengths[i - 1],
                    next: wavelengths[i],
                });
            }
        }

        Ok(Self {
            wavelengths,
            intensities,
        })
    }

    /// Parse a CSV spectrum with `wavelength` and `intensity` columns.
    ///
    /// The CSV may contain comment lines starting with `#`, extra columns
    /// (ignored), and arbitrary sampling density. Rows must already be sorted
    /// by wavelength; an unsorted file is malformed input, not something to
    /// silently reorder.
    pub fn from_csv(csv_text: &str) -> Result<Self> {
        let mut line_iter = csv_text.lines().enumerate();

        // Header row: find column indices, skipping comments and blanks.
        let header = loop {
            match line_iter.next() {
                Some((_idx, line)) => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() && !trimmed.starts_with('#') {
                        break line;
                    }
                }
                None => return Err(SpectralError::TooFewPoints(0)),
            }
        };
        let columns: Vec<&str> = header.split(',').map(|s| s.trim()).collect();

        let wl_idx = columns
            .iter()
            .position(|&c| c == "wavelength")
            .ok_or(SpectralError::MissingColumn("wavelength"))?;
        let int_idx = columns
            .iter()
            .position(|&c| c == "intensity")
            .ok_or(SpectralError::MissingColumn("intensity"))?;

        let mut wavelengths = Vec::new();
        let mut intensities = Vec::new();
        for (line_idx, line) in line_iter {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let line_num = line_idx + 1; // 1-indexed
            let fields: Vec<&str> = line.split(',').map(|s| s.trim()).collect();

            let wl: f64 = fields.get(wl_idx).unwrap_or(&"").parse().map_err(|err| {
                SpectralError::CsvField {
                    line: line_num,
                    column: "wavelength",
                    source: err,
                }
            })?;
            let intensity: f64 = fields.get(int_idx).unwrap_or(&"").parse().map_err(|err| {
                SpectralError::CsvField {
                    line: line_num,
                    column: "intensity",
                    source: err,
                }
            })?;

            wavelengths.push(wl);
            intensities.push(intensity);
        }

        Self::from_columns(wavelengths, intensities)
    }

    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    /// Intensity at `nm` by linear interpolation with boundary clamping:
    /// queries outside the sampled span return the nearest endpoint's
    /// intensity rather than extrapolating.
    pub fn sample(&self, nm: f64) -> f64 {
        interp_clamped(&self.wavelengths, &self.intensities, nm)
    }

    /// Resample onto every integer nanometer of [`GRID_MIN_NM`, `GRID_MAX_NM`]
    /// and normalize to unit intensity at [`REFERENCE_NM`].
    ///
    /// The result is the common-grid form expected by downstream comparison
    /// (similarity metric, reference illuminants). Resampling an already
    /// resampled spectrum is the identity.
    pub fn resample_to_reference_grid(&self) -> Result<Self> {
        let mut wavelengths = Vec::with_capacity((GRID_MAX_NM - GRID_MIN_NM + 1) as usize);
        let mut intensities = Vec::with_capacity(wavelengths.capacity());
        let mut reference = None;

        for nm in GRID_MIN_NM..=GRID_MAX_NM {
            let v = self.sample(f64::from(nm));
            if nm == REFERENCE_NM {
                reference = Some(v);
            }
            wavelengths.push(f64::from(nm));
            intensities.push(v);
        }

        // The grid always contains 560 nm; a missing reference would mean the
        // grid construction itself is broken.
        let reference = reference.ok_or(SpectralError::ZeroReferenceIntensity)?;
        if reference.abs() < REFERENCE_EPSILON {
            return Err(SpectralError::ZeroReferenceIntensity);
        }

        for v in &mut intensities {
            *v /= reference;
        }

        Ok(Self {
            wavelengths,
            intensities,
        })
    }
}

/// Linear interpolation over sorted knots with boundary clamping.
///
/// Exact knot hits return the stored ordinate exactly, which is what makes
/// re-resampling an already gridded spectrum the identity.
fn interp_clamped(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());

    if x <= xs[0] {
        return ys[0];
    }
    let last = xs.len() - 1;
    if x >= xs[last] {
        return ys[last];
    }

    // First knot strictly greater than x; the invariant above guarantees
    // 1 <= hi <= last.
    let hi = xs.partition_point(|&knot| knot <= x);
    let lo = hi - 1;
    if x == xs[lo] {
        return ys[lo];
    }

    let t = (x - xs[lo]) / (xs[hi] - xs[lo]);
    ys[lo] + t * (ys[hi] - ys[lo])
}
