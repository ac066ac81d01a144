use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Result, UmbraError};

/// Write rows of numbers as whitespace-separated fixed-point text, one line per row.
pub fn write_table<R: AsRef<[f64]>>(path: &Path, rows: &[R], decimals: usize) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_rows(&mut out, rows, decimals)?;
    out.flush()?;
    Ok(())
}

/// Format rows into any writer.
pub fn write_rows<W: Write, R: AsRef<[f64]>>(out: &mut W, rows: &[R], decimals: usize) -> Result<()> {
    for row in rows {
        let mut first = true;
        for v in row.as_ref() {
            if !first {
                out.write_all(b" ")?;
            }
            write!(out, "{:.*}", decimals, v)?;
            first = false;
        }
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Read a table written by `write_table`. Blank lines and `#` comments are skipped.
pub fn read_table(path: &Path) -> Result<Vec<Vec<f64>>> {
    let reader = BufReader::new(File::open(path)?);
    let mut rows = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let row = trimmed
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>().map_err(|e| UmbraError::InvalidTable {
                    line: i + 1,
                    reason: format!("'{tok}': {e}"),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    Ok(rows)
}
