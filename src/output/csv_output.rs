//! CSV report sink
//!
//! Writes the valuation table as CSV with a fixed header row. Each persist
//! call rewrites the whole file through a sibling temp file and an atomic
//! rename, so a failed write leaves the last successful table intact.

use crate::output::traits::{EnrichedRecord, ReportError, ReportResult, ReportSink};
use std::path::{Path, PathBuf};

/// Column header of the valuation table
pub const COLUMNS: [&str; 5] = ["release_id", "artist", "title", "lowest_price", "num_for_sale"];

/// CSV-file report sink
pub struct CsvReport {
    path: PathBuf,
}

impl CsvReport {
    /// Creates a sink that writes to the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        CsvReport {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Destination path of the table
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ReportSink for CsvReport {
    fn persist(&self, records: &[EnrichedRecord]) -> ReportResult<()> {
        let tmp = self.temp_path();

        {
            let mut wtr = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(&tmp)
                .map_err(|e| ReportError::Write(format!("{}: {}", tmp.display(), e)))?;

            // Header goes out even for an empty record set
            wtr.write_record(COLUMNS)?;
            for record in records {
                wtr.serialize(record)?;
            }
            wtr.flush()?;
        }

        // Swap into place only after the full table hit disk
        std::fs::rename(&tmp, &self.path)?;

        tracing::debug!("saved {} rows to {}", records.len(), self.path.display());
        Ok(())
    }
}
