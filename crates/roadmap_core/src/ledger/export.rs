//! Downloadable ledger export.

use crate::ledger::progress::LedgerEntries;
use chrono::NaiveDate;
use log::info;
use std::io;
use std::path::{Path, PathBuf};

const EXPORT_FILE_PREFIX: &str = "roadmap_progress_";

/// Serialized ledger ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    /// `roadmap_progress_<YYYY-MM-DD>.json`
    pub file_name: String,
    /// The ledger as a JSON object.
    pub body: String,
}

impl ExportDocument {
    /// Writes the document into `dir` and returns the created path.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> io::Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, self.body.as_bytes())?;
        info!(
            "event=ledger_export module=ledger status=ok bytes={}",
            self.body.len()
        );
        Ok(path)
    }
}

/// Serializes the full ledger, naming the document after `today`.
pub fn export_ledger(
    entries: &LedgerEntries,
    today: NaiveDate,
) -> serde_json::Result<ExportDocument> {
    Ok(ExportDocument {
        file_name: format!("{EXPORT_FILE_PREFIX}{}.json", today.format("%Y-%m-%d")),
        body: entries.to_json()?,
    })
}

#[cfg(test)]
mod tests {
    use super::export_ledger;
    use crate::ledger::progress::LedgerEntries;
    use chrono::NaiveDate;

    #[test]
    fn names_document_with_date_and_writes_it() {
        let entries = LedgerEntries::from_json(r#"{"May-0":100}"#).expect("valid ledger");
        let today = NaiveDate::from_ymd_opt(2025, 10, 15).expect("valid date");
        let document = export_ledger(&entries, today).expect("export");
        assert_eq!(document.file_name, "roadmap_progress_2025-10-15.json");
        assert_eq!(document.body, r#"{"May-0":100}"#);

        let dir = tempfile::tempdir().expect("tempdir");
        let path = document.write_to(dir.path()).expect("write export");
        assert_eq!(
            std::fs::read_to_string(path).expect("read back"),
            document.body
        );
    }
}
