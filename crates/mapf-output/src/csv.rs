//! CSV output backend for life-long runs.
//!
//! One row per run, appended to a shared file so that experiment sweeps
//! collect into a single table.  The header row is written only when the
//! file is new or empty.

use std::fs::{File, OpenOptions};
use std::path::Path;

use csv::{Writer, WriterBuilder};

use crate::{LifelongRow, OutputResult};

pub struct CsvAppender {
    writer: Writer<File>,
}

impl CsvAppender {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: &Path) -> OutputResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let is_new = file.metadata()?.len() == 0;
        let writer = WriterBuilder::new().has_headers(is_new).from_writer(file);
        Ok(Self { writer })
    }

    pub fn append(&mut self, row: &LifelongRow) -> OutputResult<()> {
        self.writer.serialize(row)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Open, append one row, close.
pub fn append_row(path: &Path, row: &LifelongRow) -> OutputResult<()> {
    CsvAppender::open(path)?.append(row)?;
    log::info!("result row appended to {}", path.display());
    Ok(())
}

