use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use tracing::{debug, info};

/// Append-only CSV file with a fixed header row.
#[derive(Debug, Clone)]
pub struct TabularLog {
    path: PathBuf,
    header: Vec<String>,
}

/// Header plus every data row, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSnapshot {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TabularLog {
    /// Opens the log at `path`, writing `header` first if the file does not
    /// exist yet. An existing file must carry exactly this header.
    pub fn open_or_init(path: impl Into<PathBuf>, header: &[&str]) -> anyhow::Result<Self> {
        let log = Self {
            path: path.into(),
            header: header.iter().map(|h| h.to_string()).collect(),
        };

        match log.read_header()? {
            Some(existing) if existing == log.header => {
                debug!(path = %log.path.display(), "tabular log present");
            }
            Some(existing) => bail!(
                "{} has header {:?}, expected {:?}",
                log.path.display(),
                existing,
                log.header
            ),
            None => {
                let mut file = File::create(&log.path)
                    .with_context(|| format!("create {}", log.path.display()))?;
                file.write_all(&encode_record(&log.header)?)
                    .and_then(|_| file.flush())
                    .with_context(|| format!("write header to {}", log.path.display()))?;
                info!(path = %log.path.display(), "tabular log initialised");
            }
        }
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Appends one row with a single buffered write followed by a flush.
    pub fn append_row(&self, row: &[String]) -> anyhow::Result<()> {
        if row.len() != self.header.len() {
            bail!(
                "row has {} columns, log {} expects {}",
                row.len(),
                self.path.display(),
                self.header.len()
            );
        }
        let buf = encode_record(row)?;
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open {} for append", self.path.display()))?;
        file.write_all(&buf)
            .and_then(|_| file.flush())
            .with_context(|| format!("append row to {}", self.path.display()))?;
        Ok(())
    }

    /// Reads the whole file. `None` when it does not exist.
    pub fn read_all(&self) -> anyhow::Result<Option<LogSnapshot>> {
        read_snapshot(&self.path)
    }

    fn read_header(&self) -> anyhow::Result<Option<Vec<String>>> {
        Ok(read_snapshot(&self.path)?.map(|s| s.header))
    }
}

pub fn read_snapshot(path: &Path) -> anyhow::Result<Option<LogSnapshot>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("open {}", path.display())),
    };

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);
    let header = reader
        .headers()
        .with_context(|| format!("read header of {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read row of {}", path.display()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(Some(LogSnapshot { header, rows }))
}

fn encode_record(fields: &[String]) -> anyhow::Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(fields).context("encode csv row")?;
    wtr.into_inner()
        .map_err(|e| anyhow!("encode csv row: {}", e.error()))
}
