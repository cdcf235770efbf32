//! Head-difference table input.
//!
//! The expected shape mirrors the measurement exports this tool consumes:
//! the first column is the 0-based time-step index, every further column is
//! one branch (building connection) with the head difference in metres.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::opt::error::OptimizeError;
use crate::opt::types::HeadSeries;

/// Reads a head-difference table from a CSV file.
///
/// # Errors
///
/// Returns `InvalidInput` if the file cannot be opened or the table is
/// malformed.
pub fn read_head_csv_path(path: &Path) -> Result<HeadSeries, OptimizeError> {
    let file = File::open(path).map_err(|e| {
        OptimizeError::InvalidInput(format!("cannot read \"{}\": {e}", path.display()))
    })?;
    read_head_csv(file)
}

/// Reads a head-difference table from any reader.
///
/// # Errors
///
/// Returns `InvalidInput` for a missing header, a non-sequential index
/// column, a ragged row, or an unparsable value.
pub fn read_head_csv(reader: impl Read) -> Result<HeadSeries, OptimizeError> {
    let mut rdr = csv::ReaderBuilder::new().from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| OptimizeError::InvalidInput(format!("head table header: {e}")))?;
    if headers.len() < 2 {
        return Err(OptimizeError::InvalidInput(
            "head table needs an index column and at least one branch column".to_string(),
        ));
    }
    // First column is the time-step index; its name is ignored.
    let branch_ids: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut rows = Vec::new();
    for (t, record) in rdr.records().enumerate() {
        let record =
            record.map_err(|e| OptimizeError::InvalidInput(format!("head table row {t}: {e}")))?;
        if record.len() != branch_ids.len() + 1 {
            return Err(OptimizeError::InvalidInput(format!(
                "head table row {t} has {} fields, expected {}",
                record.len(),
                branch_ids.len() + 1
            )));
        }
        let index: usize = record[0].trim().parse().map_err(|_| {
            OptimizeError::InvalidInput(format!(
                "head table row {t} has index \"{}\", expected an integer",
                &record[0]
            ))
        })?;
        if index != t {
            return Err(OptimizeError::InvalidInput(format!(
                "head table row {t} is indexed {index}, expected {t}"
            )));
        }
        let mut row = Vec::with_capacity(branch_ids.len());
        for field in record.iter().skip(1) {
            let head: f64 = field.trim().parse().map_err(|_| {
                OptimizeError::InvalidInput(format!(
                    "head table row {t} has value \"{field}\", expected a number"
                ))
            })?;
            row.push(head);
        }
        rows.push(row);
    }

    HeadSeries::new(branch_ids, rows)
}
