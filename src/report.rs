//! Summaries of a computed field, and writing it to disk.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{error::Result, grid_setup::OutputField};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldStats {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub mean: f64,
    /// Grid indices (i, j) of the largest value.
    pub argmax: (usize, usize),
}

impl FieldStats {
    pub fn new(field: &OutputField) -> Self {
        let n = field.n();

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.;
        let mut i_max = 0;

        for (idx, v) in field.data.iter().enumerate() {
            if *v < min {
                min = *v;
            }
            if *v > max {
                max = *v;
                i_max = idx;
            }
            sum += v;
        }

        Self {
            min,
            max,
            sum,
            mean: sum / field.data.len() as f64,
            argmax: (i_max / n, i_max % n),
        }
    }
}

/// Write the field as text: one grid row (fixed x) per line, values separated by spaces.
pub fn write_field(path: &Path, field: &OutputField) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);

    for row in field.rows() {
        let line: Vec<String> = row.iter().map(|v| format!("{v:.12e}")).collect();
        writeln!(writer, "{}", line.join(" "))?;
    }
    writer.flush()?;

    Ok(())
}
