//! JSON-lines row files

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use traitqa_core::{DescriptionRow, RowResult};

/// Read one `DescriptionRow` per non-blank line
pub fn read_rows(path: &Path) -> Result<Vec<DescriptionRow>> {
    let file =
        File::open(path).with_context(|| format!("failed to open rows file {}", path.display()))?;

    let mut rows = Vec::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let row: DescriptionRow = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid row", path.display(), number + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Write one `RowResult` per line
pub fn write_results(path: &Path, results: &[RowResult]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    for result in results {
        serde_json::to_writer(&mut writer, result)?;
        writer.write_all(b"\n")?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))
}
