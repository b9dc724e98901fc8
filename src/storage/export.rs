use std::path::PathBuf;

use anyhow::Context;
use rust_xlsxwriter::{Format, Workbook};
use tracing::debug;

use super::log::LogSnapshot;

/// Produces the spreadsheet mirror of the tabular log.
///
/// Implementations receive the complete log on every call and must replace
/// whatever they produced before; nothing is patched incrementally.
pub trait SpreadsheetExporter: Send + Sync {
    fn export(&self, snapshot: &LogSnapshot) -> anyhow::Result<()>;
}

/// Writes an `.xlsx` workbook with one sheet: bold header row, then every log
/// row as text cells. Empty log cells stay blank.
#[derive(Debug, Clone)]
pub struct XlsxExporter {
    path: PathBuf,
}

impl XlsxExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SpreadsheetExporter for XlsxExporter {
    fn export(&self, snapshot: &LogSnapshot) -> anyhow::Result<()> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Sheet1")?;

        let bold = Format::new().set_bold();
        for (col, title) in snapshot.header.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, title, &bold)?;
        }
        for (i, row) in snapshot.rows.iter().enumerate() {
            let r = (i + 1) as u32;
            for (col, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    sheet.write_string(r, col as u16, value)?;
                }
            }
        }

        workbook
            .save(&self.path)
            .with_context(|| format!("write spreadsheet {}", self.path.display()))?;
        debug!(path = %self.path.display(), rows = snapshot.rows.len(), "spreadsheet regenerated");
        Ok(())
    }
}
