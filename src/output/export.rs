use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use crate::schema::CanonicalField;
use crate::scoring::RecordScore;

/// Computed columns appended after the canonical ones.
pub const COMPUTED_COLUMNS: [&str; 2] = ["adjusted_carbon", "effective_eco_score"];

pub fn export_headers() -> Vec<&'static str> {
    CanonicalField::ALL
        .iter()
        .map(|f| f.as_str())
        .chain(COMPUTED_COLUMNS)
        .collect()
}

fn number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Cells for one scored record, in header order. Missing values are empty.
pub fn export_row(score: &RecordScore) -> Vec<String> {
    let rec = score.record;
    vec![
        rec.product.clone(),
        rec.category.clone(),
        text(&rec.brand),
        number(rec.price),
        number(rec.eco_score),
        number(rec.carbon_intensity),
        text(&rec.packaging_type),
        rec.main_ingredients.join(", "),
        text(&rec.country_of_origin),
        number(Some(score.recyclability)),
        number(score.adjusted_carbon),
        number(score.eco_score),
    ]
}

/// Write scored records as CSV with a header row.
pub fn write_export<W: Write>(writer: W, rows: &[RecordScore]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(export_headers())
        .context("Failed to write CSV header")?;
    for row in rows {
        wtr.write_record(export_row(row))
            .with_context(|| format!("Failed to write CSV row for {}", row.record.product))?;
    }
    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Export scored records to a CSV file atomically.
///
/// Returns the number of data rows written.
pub fn export_csv(path: &Path, rows: &[RecordScore]) -> Result<usize> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    write_export(&mut file, rows)?;
    file.commit()
        .with_context(|| format!("Failed to save export to {}", path.display()))?;

    tracing::info!(path = %path.display(), rows = rows.len(), "exported CSV");
    Ok(rows.len())
}
