//! Proc macro that embeds a CIE standard observer color matching function
//! table from a CSV file at compile time.
//!
//! The embedded table becomes a plain `const` array, so the observer data is
//! immutable, shared, and free of runtime parsing or lazy initialization.
//!
//! Source data: CIE 018:2019, abridged to 10 nm steps
//! (<https://cie.co.at/datatable/cie-1931-colour-matching-functions-2-degree-observer>)

use proc_macro::TokenStream;
use std::path::PathBuf;
use syn::{LitStr, parse_macro_input};

/// Reads an observer CSV and expands to an array literal of
/// `(f64, f64, f64, f64)` tuples: `(wavelength_nm, x_bar, y_bar, z_bar)`.
///
/// The path is resolved relative to the calling crate's `CARGO_MANIFEST_DIR`.
/// Rows must be sorted by wavelength and evenly spaced; both are checked at
/// expansion time so a corrupted data file fails the build, not a computation.
///
/// ```ignore
/// const CMF_TABLE: [(f64, f64, f64, f64); 41] =
///     cie_cmf::observer_table!("data/cie_1931_2deg_10nm.csv");
/// ```
#[proc_macro]
pub fn observer_table(input: TokenStream) -> TokenStream {
    let lit = parse_macro_input!(input as LitStr);
    let path = resolve_path(&lit.value());

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(&path)
        .unwrap_or_else(|e| panic!("Failed to open {}: {e}", path.display()));

    let mut rows: Vec<(f64, f64, f64, f64)> = Vec::new();
    for result in rdr.records() {
        let record =
            result.unwrap_or_else(|e| panic!("CSV parse error in {}: {e}", path.display()));
        assert_eq!(
            record.len(),
            4,
            "Expected 4 columns in {}, got {} at record {}",
            path.display(),
            record.len(),
            rows.len() + 1,
        );

        let field = |i: usize, name: &str| -> f64 {
            record[i]
                .trim()
                .parse()
                .unwrap_or_else(|e| panic!("Invalid {name} '{}': {e}", &record[i]))
        };

        rows.push((
            field(0, "wavelength"),
            field(1, "x_bar"),
            field(2, "y_bar"),
            field(3, "z_bar"),
        ));
    }

    assert!(
        rows.len() >= 2,
        "CSV file {} needs at least 2 rows",
        path.display()
    );

    let step = rows[1].0 - rows[0].0;
    assert!(step > 0.0, "Wavelengths in {} must ascend", path.display());
    for pair in rows.windows(2) {
        let d = pair[1].0 - pair[0].0;
        assert!(
            (d - step).abs() < 1e-9,
            "Uneven wavelength step in {}: {d} after {step}",
            path.display()
        );
    }

    let entries: Vec<String> = rows
        .iter()
        .map(|(wl, x, y, z)| format!("({wl}_f64, {x}_f64, {y}_f64, {z}_f64)"))
        .collect();

    let body = entries.join(",\n    ");
    let code = format!("[\n    {body}\n]");

    code.parse()
        .expect("failed to parse generated array literal")
}

/// Resolve a path relative to the calling crate's CARGO_MANIFEST_DIR.
fn resolve_path(relative: &str) -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let path = PathBuf::from(manifest_dir).join(relative);
    assert!(
        path.exists(),
        "CIE data file not found at {}",
        path.display()
    );
    path
}
