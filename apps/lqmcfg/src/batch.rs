//! CSV batch files.
//!
//! One request per row. The header is checked up front; a row that fails to
//! parse is kept as an error so it can be reported in sequence and skipped.

use crate::error::CliError;
use lqm_core::{LqmError, LqmKind, LqmRequest, Thresholds};
use std::collections::BTreeMap;
use std::path::Path;

/// A parsed CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRow {
    /// 1-based data row number (the header is not counted).
    pub number: usize,
    pub request: Result<LqmRequest, LqmError>,
}

/// Read a batch file for the given kind.
///
/// # Errors
///
/// Returns [`CliError::FileNotFound`] for a missing file,
/// [`CliError::Lqm`] with [`LqmError::CsvHeader`] for a header that does not
/// match the kind, and [`CliError::Csv`] for unreadable CSV.
pub fn load(path: &Path, kind: LqmKind) -> Result<Vec<BatchRow>, CliError> {
    if !path.is_file() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }
    let csv_err = |source| CliError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let header: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();
    kind.check_header(&header)?;

    let columns: BTreeMap<&str, usize> = header
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(csv_err)?;
        let cell = |name: &str| columns.get(name).and_then(|&i| record.get(i));
        let request = Thresholds::from_cells(
            cell("latency").unwrap_or_default(),
            cell("jitter").unwrap_or_default(),
            cell("packetloss").unwrap_or_default(),
        )
        .and_then(|thresholds| {
            LqmRequest::new(kind, cell("site"), cell("element"), cell("app"), thresholds)
        });

        rows.push(BatchRow {
            number: index + 1,
            request,
        });
    }

    Ok(rows)
}
