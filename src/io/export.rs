//! CSV persistence of solved dispatch schedules.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::opt::error::ExportError;
use crate::opt::solution::SolvedDispatch;

/// Writes a solved schedule as CSV to any writer.
///
/// Writes a header row followed by one data row per time step. Floats are
/// written in shortest round-trippable form, so reading the output back
/// reproduces the in-memory table exactly.
///
/// # Errors
///
/// Returns `NotSolved` when the model's status is not optimal, or a
/// CSV/I/O error if writing fails.
pub fn write_solution_csv(
    solved: &SolvedDispatch,
    writer: impl Write,
) -> Result<(), ExportError> {
    let table = solved.table()?;
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(solved.header())?;
    for (row, record) in solved.rows.iter().zip(table) {
        let mut fields = vec![row.timestep.to_string()];
        fields.extend(record.iter().skip(1).map(f64::to_string));
        wtr.write_record(&fields)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Persists a solved schedule under a label-derived filename.
///
/// The file is `<dir>/<label>dispatch.csv`; the label is used verbatim as
/// a prefix and must be filesystem-safe. An existing file is overwritten,
/// so repeating a run replaces the artifact rather than appending to it.
///
/// # Errors
///
/// Returns `NotSolved` for a non-optimal model or an I/O error from file
/// creation or writing.
pub fn export_solution_csv(
    solved: &SolvedDispatch,
    dir: &Path,
    label: &str,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(format!("{label}dispatch.csv"));
    let file = File::create(&path)?;
    write_solution_csv(solved, BufWriter::new(file))?;
    Ok(path)
}

/// Reads a persisted schedule back as `(header, rows)`.
///
/// # Errors
///
/// Returns a CSV error for a malformed file or an I/O error from the
/// reader. Fields that fail to parse as numbers become an I/O error with
/// the offending value.
pub fn read_solution_csv(reader: impl Read) -> Result<(Vec<String>, Vec<Vec<f64>>), ExportError> {
    let mut rdr = csv::ReaderBuilder::new().from_reader(reader);

    let header: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let mut row = Vec::with_capacity(record.len());
        for field in record.iter() {
            let value: f64 = field.trim().parse().map_err(|_| {
                ExportError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("non-numeric field \"{field}\" in solution table"),
                ))
            })?;
            row.push(value);
        }
        rows.push(row);
    }
    Ok((header, rows))
}

/// Reads a persisted schedule from a file path.
///
/// # Errors
///
/// Same failure modes as [`read_solution_csv`], plus file-open errors.
pub fn read_solution_csv_path(path: &Path) -> Result<(Vec<String>, Vec<Vec<f64>>), ExportError> {
    let file = File::open(path)?;
    read_solution_csv(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opt::solution::DispatchRow;
    use crate::opt::types::{PumpingMode, SolveStatus};

    fn make_solved() -> SolvedDispatch {
        let rows = (0..3)
            .map(|t| DispatchRow {
                timestep: t,
                time_hr: t as f64 * 0.5,
                plant_kw: 10.0 + t as f64 / 3.0,
                charge_kw: 2.25,
                discharge_kw: 0.0,
                soc_kwh: 4.5 - t as f64,
                pumping_kw: 0.125,
                delivered_kw: vec![6.0, 4.0 + t as f64 * 0.1],
            })
            .collect();
        SolvedDispatch {
            status: SolveStatus::Optimal,
            objective_cost: 12.0,
            pumping_mode: PumpingMode::Centralized,
            tes_capacity_kwh: 10.0,
            building_ids: vec!["office_a".to_string(), "campus_b".to_string()],
            rows,
        }
    }

    #[test]
    fn header_row_matches_schedule_header() {
        let solved = make_solved();
        let mut buf = Vec::new();
        let result = write_solution_csv(&solved, &mut buf);
        assert!(result.is_ok());
        let output = String::from_utf8(buf).ok();
        let first_line = output.as_deref().unwrap_or("").lines().next().unwrap_or("");
        assert_eq!(first_line, solved.header().join(","));
    }

    #[test]
    fn row_count_matches_step_count() {
        let solved = make_solved();
        let mut buf = Vec::new();
        write_solution_csv(&solved, &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let lines = output.as_deref().unwrap_or("").lines().count();
        // 1 header + 3 data rows
        assert_eq!(lines, 4);
    }

    #[test]
    fn deterministic_output() {
        let solved = make_solved();
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_solution_csv(&solved, &mut buf1).ok();
        write_solution_csv(&solved, &mut buf2).ok();
        assert_eq!(buf1, buf2);
    }

    #[test]
    fn round_trip_reproduces_the_table() {
        let solved = make_solved();
        let mut buf = Vec::new();
        write_solution_csv(&solved, &mut buf).ok();

        let parsed = read_solution_csv(buf.as_slice()).ok();
        assert!(parsed.is_some());
        let (header, rows) = parsed.unwrap_or_default();
        assert_eq!(header, solved.header());
        assert_eq!(Some(rows), solved.table().ok());
    }

    #[test]
    fn non_optimal_schedule_is_refused() {
        let mut solved = make_solved();
        solved.status = SolveStatus::Unbounded;
        let mut buf = Vec::new();
        let result = write_solution_csv(&solved, &mut buf);
        assert!(matches!(result, Err(ExportError::NotSolved(_))));
        assert!(buf.is_empty(), "nothing should be written on failure");
    }

    #[test]
    fn non_numeric_readback_is_an_error() {
        let csv = "timestep,plant_kw\n0,ten\n";
        let result = read_solution_csv(csv.as_bytes());
        assert!(result.is_err());
    }
}
