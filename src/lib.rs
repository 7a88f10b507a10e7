//! Correlated color temperature estimation from spectral power
//! distributions.
//!
//! The pipeline is a one-way data flow: raw SPD → tristimulus integration
//! against the CIE 1931 standard observer → chromaticity projection →
//! bounded inversion of a Planckian locus approximation → a single CCT in
//! Kelvin. A companion resampler ([`SpectralDistribution::resample_to_reference_grid`])
//! prepares spectra for comparison on the common integer-nanometer grid.
//!
//! Every invocation is stateless and reentrant: the only shared value is
//! the compile-time observer table, so concurrent callers need no
//! coordination. All failure modes (malformed input, degenerate spectra,
//! normalization failures) surface as [`SpectralError`] values; nothing
//! here panics on bad data.

pub mod cct;
pub mod chromaticity;
pub mod cmf;
pub mod error;
pub mod spd;
pub mod tristimulus;

pub use cct::{CCT_MAX_K, CCT_MIN_K, CCT_SEED_K, CctEstimate, mccamy_cct};
pub use chromaticity::Chromaticity;
pub use cmf::{CIE_1931_2DEG, Observer};
pub use error::{Result, SpectralError};
pub use spd::{GRID_MAX_NM, GRID_MIN_NM, REFERENCE_NM, SpectralDistribution};
pub use tristimulus::Tristimulus;

/// Estimate the correlated color temperature of a light source.
///
/// Integrates the spectrum against [`CIE_1931_2DEG`], projects to
/// chromaticity, and inverts the Planckian locus model over the
/// [`CCT_MIN_K`, `CCT_MAX_K`] search domain. Deterministic for a given
/// input: the solver runs from a fixed seed with fixed bounds.
///
/// # Errors
///
/// [`SpectralError::DegenerateSpectrum`] when the spectrum carries no
/// energy under the observer, [`SpectralError::DegenerateChromaticity`]
/// for a degenerate projection. Malformed inputs never get this far; they
/// are rejected when the [`SpectralDistribution`] is constructed.
pub fn estimate_cct(spd: &SpectralDistribution) -> Result<CctEstimate> {
    let xyz = tristimulus::integrate(spd, &CIE_1931_2DEG);
    let chroma = Chromaticity::from_tristimulus(&xyz)?;
    let estimate = cct::solve(chroma.x);

    tracing::debug!(
        x = chroma.x,
        y = chroma.y,
        u = chroma.u,
        v = chroma.v,
        kelvin = estimate.kelvin,
        fit_error = estimate.fit_error,
        at_search_bound = estimate.at_search_bound,
        "estimated cct"
    );

    Ok(estimate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_zero_spectrum_is_a_domain_error() {
        let spd =
            SpectralDistribution::from_points(&[(400.0, 0.0), (500.0, 0.0), (600.0, 0.0)])
                .unwrap();
        assert!(matches!(
            estimate_cct(&spd),
            Err(SpectralError::DegenerateSpectrum(_))
        ));
    }

    #[test]
    fn estimate_is_reproducible() {
        let spd = SpectralDistribution::from_points(&[
            (400.0, 0.2),
            (500.0, 0.8),
            (600.0, 1.0),
            (700.0, 0.5),
        ])
        .unwrap();
        let a = estimate_cct(&spd).unwrap();
        let b = estimate_cct(&spd).unwrap();
        assert_eq!(a, b);
    }
}
