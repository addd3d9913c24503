//! CSV writing for the export tables.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use contactlog_core::Table;

/// Writes one table to a CSV file.
pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_to(file, &[table])
}

/// Writes the two statistics tables to one CSV file, separated by a blank
/// line.
pub fn write_stats(path: &Path, by_domain: &Table, by_email: &Table) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_to(file, &[by_domain, by_email])
}

fn write_to(out: impl Write, tables: &[&Table]) -> Result<()> {
    // Flexible: stacked tables and the blank separator differ in width
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(out);
    for (i, table) in tables.iter().enumerate() {
        if i > 0 {
            writer.write_record([""])?;
        }
        writer.write_record(&table.header)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
    }
    writer.flush()?;
    Ok(())
}
