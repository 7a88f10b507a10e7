//! CIE 1931 2-degree standard observer color matching functions.
//!
//! The table is baked in at compile time, so the observer is a process-wide
//! immutable constant: every computation reads the same data with no locking
//! and no mutable global.

/// Abridged 10 nm table, 380-780 nm. Each entry: (wavelength_nm, x_bar,
/// y_bar, z_bar).
///
/// Source: CIE 018:2019 (DOI: 10.25039/CIE.DS.xvudnb9b)
const CMF_TABLE: [(f64, f64, f64, f64); 41] =
    cie_cmf::observer_table!("data/cie_1931_2deg_10nm.csv");

/// A tabulated standard observer: the three color matching curves
/// (x̄, ȳ, z̄) sampled at fixed wavelength steps.
#[derive(Debug, Clone, Copy)]
pub struct Observer {
    table: &'static [(f64, f64, f64, f64)],
}

/// The CIE 1931 2-degree observer used throughout the pipeline.
pub const CIE_1931_2DEG: Observer = Observer { table: &CMF_TABLE };

impl Observer {
    /// Inclusive wavelength domain of the tabulation, in nanometers.
    pub fn domain(&self) -> (f64, f64) {
        (self.table[0].0, self.table[self.table.len() - 1].0)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// `(x̄, ȳ, z̄)` at `nm`, by linear interpolation with boundary clamping:
    /// queries outside the tabulated domain return the endpoint row, matching
    /// the interpolation semantics used for spectra.
    pub fn sample(&self, nm: f64) -> (f64, f64, f64) {
        let first = self.table[0];
        if nm <= first.0 {
            return (first.1, first.2, first.3);
        }
        let last = self.table[self.table.len() - 1];
        if nm >= last.0 {
            return (last.1, last.2, last.3);
        }

        let hi = self.table.partition_point(|row| row.0 <= nm);
        let lo = hi - 1;
        let (wl_lo, x0, y0, z0) = self.table[lo];
        if nm == wl_lo {
            return (x0, y0, z0);
        }
        let (wl_hi, x1, y1, z1) = self.table[hi];

        let t = (nm - wl_lo) / (wl_hi - wl_lo);
        (
            x0 + t * (x1 - x0),
            y0 + t * (y1 - y0),
            z0 + t * (z1 - z0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_abridged_domain() {
        assert_eq!(CIE_1931_2DEG.len(), 41);
        assert_eq!(CIE_1931_2DEG.domain(), (380.0, 780.0));
    }

    #[test]
    fn sample_at_knot_is_exact() {
        let (x, y, z) = CIE_1931_2DEG.sample(560.0);
        assert_eq!(x, 0.5945);
        assert_eq!(y, 0.995);
        assert_eq!(z, 0.0039);
    }

    #[test]
    fn sample_clamps_outside_domain() {
        assert_eq!(CIE_1931_2DEG.sample(300.0), CIE_1931_2DEG.sample(380.0));
        assert_eq!(CIE_1931_2DEG.sample(830.0), CIE_1931_2DEG.sample(780.0));
    }

    #[test]
    fn curves_are_nonnegative_and_finite() {
        for &(wl, x, y, z) in &CMF_TABLE {
            assert!(wl.is_finite());
            assert!(x >= 0.0 && x.is_finite());
            assert!(y >= 0.0 && y.is_finite());
            assert!(z >= 0.0 && z.is_finite());
        }
    }

    #[test]
    fn curve_integrals_roughly_agree() {
        // The CIE curves are scaled so equal-energy white has equal
        // tristimulus components; the abridged sums agree to well under 1%.
        let (sx, sy, sz) = CMF_TABLE
            .iter()
            .fold((0.0, 0.0, 0.0), |(ax, ay, az), &(_, x, y, z)| {
                (ax + x, ay + y, az + z)
            });
        assert!((sx / sy - 1.0).abs() < 0.01, "sx={sx} sy={sy}");
        assert!((sz / sy - 1.0).abs() < 0.01, "sz={sz} sy={sy}");
    }
}
