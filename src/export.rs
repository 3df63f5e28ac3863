use csv::Writer;
use log::info;
use std::{io::Write, path::Path};
use tempfile::NamedTempFile;

use crate::convert::format_decimal;
use crate::error::BoardResult;
use crate::models::DisplayRow;

/// UTF-8 byte-order mark so spreadsheet software picks the right encoding.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn header(amount: f64) -> [String; 3] {
    [
        "货币/Currency".to_string(),
        "当前汇率/Rate".to_string(),
        format!("{} 人民币可兑换/Converted", format_decimal(amount)),
    ]
}

/// Writes the conversion table as BOM-prefixed CSV.
pub fn write_rows<W: Write>(mut out: W, rows: &[DisplayRow], amount: f64) -> BoardResult<()> {
    out.write_all(UTF8_BOM)?;

    let mut writer = Writer::from_writer(out);
    writer.write_record(header(amount))?;
    for row in rows {
        writer.write_record([
            row.label.as_str(),
            format_decimal(row.inverse_rate).as_str(),
            row.converted.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the CSV next to `path` and renames it into place, so readers see
/// either the previous export or the complete new one.
pub fn write_csv(path: &Path, rows: &[DisplayRow], amount: f64) -> BoardResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    write_rows(staged.as_file_mut(), rows, amount)?;
    staged.persist(path).map_err(|e| e.error)?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}
