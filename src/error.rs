use thiserror::Error;

pub type Result<T> = std::result::Result<T, SpectralError>;

/// Everything in this crate is recoverable: a bad spectrum produces an error
/// value for the hosting layer to display, never a NaN, a silent clamp, or a
/// panic.
#[derive(Debug, Error)]
pub enum SpectralError {
    #[error("need at least 2 spectral points for interpolation, got {0}")]
    TooFewPoints(usize),

    #[error(
        "wavelengths must be strictly increasing: index {index} has {next} nm after {prev} nm"
    )]
    NonMonotonicWavelengths { index: usize, prev: f64, next: f64 },

    #[error("non-finite wavelength or intensity at index {0}")]
    NonFiniteValue(usize),

    #[error("{wavelengths} wavelengths but {intensities} intensities")]
    MismatchedColumns { wavelengths: usize, intensities: usize },

    #[error("missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("line {line}, column '{column}': {source}")]
    CsvField {
        line: usize,
        column: &'static str,
        source: std::num::ParseFloatError,
    },

    #[error("spectrum has no energy under the standard observer (X+Y+Z = {0})")]
    DegenerateSpectrum(f64),

    #[error("intensity at the 560 nm reference wavelength is zero; cannot normalize")]
    ZeroReferenceIntensity,

    #[error("degenerate chromaticity: denominator is {0}")]
    DegenerateChromaticity(f64),
}
