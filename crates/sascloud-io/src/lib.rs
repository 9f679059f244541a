#![warn(missing_docs)]

//! Export writers for sample clouds and intensity curves.
//!
//! A cloud can be written as line-oriented XYZ coordinate records or as
//! PDB-style `ATOM` records (the layout downstream scattering programs
//! ingest). Intensity curves go out as two-column `q I` text.

use std::io::Write;

use sascloud_sample::SampleCloud;
use thiserror::Error;

/// Errors that can occur while writing export files.
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O error on the underlying writer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Mismatched q/intensity lengths.
    #[error("intensity curve has {i} values for {q} q-values")]
    CurveMismatch {
        /// Number of q-values.
        q: usize,
        /// Number of intensity values.
        i: usize,
    },
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Write a cloud as XYZ records: a `#` comment line, then one
/// `LABEL<TAB>x<TAB>y<TAB>z` line per point.
pub fn write_xyz<W: Write>(
    writer: &mut W,
    cloud: &SampleCloud,
    atom_label: &str,
    comment: &str,
) -> Result<()> {
    writeln!(writer, "#{}", comment)?;
    for p in cloud.points() {
        writeln!(writer, "{}\t{}\t{}\t{}", atom_label, p.x, p.y, p.z)?;
    }
    Ok(())
}

/// Write a cloud as PDB-style `ATOM` records.
///
/// Coordinates are formatted to two decimals in 8-character fields, the
/// layout expected by PDB-consuming scattering tools.
pub fn write_pdb<W: Write>(
    writer: &mut W,
    cloud: &SampleCloud,
    atom_label: &str,
    occupancy: f64,
    temp_factor: f64,
) -> Result<()> {
    writeln!(writer, "REMARK 265 EXPERIMENT TYPE: THEORETICAL MODELLING")?;
    for (i, p) in cloud.points().iter().enumerate() {
        let x = format!("{:.2}", p.x);
        let y = format!("{:.2}", p.y);
        let z = format!("{:.2}", p.z);
        writeln!(
            writer,
            "ATOM  {:5} {:<4} ASP A{:4}    {:>8}{:>8}{:>8}{:>6}{:>6} 0 2 201",
            i,
            atom_label,
            i % 10,
            x,
            y,
            z,
            occupancy,
            temp_factor,
        )?;
    }
    Ok(())
}

/// Write an intensity curve as two-column `q<TAB>I` text with `#`-prefixed
/// header lines.
pub fn write_intensity<W: Write>(
    writer: &mut W,
    q: &[f64],
    intensity: &[f64],
    header: &str,
) -> Result<()> {
    if q.len() != intensity.len() {
        return Err(ExportError::CurveMismatch {
            q: q.len(),
            i: intensity.len(),
        });
    }
    for line in header.lines() {
        writeln!(writer, "# {}", line)?;
    }
    writeln!(writer, "# q\tI")?;
    for (qi, ii) in q.iter().zip(intensity) {
        writeln!(writer, "{}\t{}", qi, ii)?;
    }
    Ok(())
}
