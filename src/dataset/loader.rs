use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::LoadError;

/// One data row as read from the source, before any typing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based line number in the source file
    pub line: usize,
    pub cells: Vec<String>,
}

impl RawRow {
    /// Cell at a column position; short rows yield None.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }
}

/// Header labels plus string rows, exactly as found in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == label)
    }
}

/// Load a CSV file into a raw table.
pub fn load_csv(path: &Path) -> Result<RawTable, LoadError> {
    let file = File::open(path)
        .map_err(|e| LoadError::Unreadable(format!("{}: {}", path.display(), e)))?;
    let table = read_csv(file)?;
    tracing::info!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "loaded dataset"
    );
    Ok(table)
}

/// Read CSV from any reader. Ragged rows are accepted; cells are trimmed.
pub fn read_csv<R: Read>(reader: R) -> Result<RawTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::Malformed(format!("failed to read header: {}", e)))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::NoHeader);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| LoadError::Malformed(e.to_string()))?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        rows.push(RawRow {
            line,
            cells: record.iter().map(str::to_string).collect(),
        });
    }

    Ok(RawTable { headers, rows })
}
