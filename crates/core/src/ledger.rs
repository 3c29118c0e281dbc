use crate::error::LedgerError;
use crate::models::SavedSummary;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Append-only JSON Lines store of saved summaries, one row per line,
/// keyed by filename. Duplicate saves are a defined no-op.
///
/// The existence check reads the whole file before appending; with a
/// single writer per process that keeps at most one row per key. Nothing
/// here locks the file against concurrent writers.
pub struct SummaryLedger {
    path: PathBuf,
}

impl SummaryLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All rows currently persisted. A missing file is an empty ledger;
    /// malformed lines are skipped, preserving everything else.
    pub fn load(&self) -> Result<Vec<SavedSummary>, LedgerError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };

        let mut rows = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<SavedSummary>(line) {
                Ok(row) => rows.push(row),
                Err(error) => {
                    warn!(
                        path = %self.path.display(),
                        line = line_no + 1,
                        error = %error,
                        "skipping malformed ledger line"
                    );
                }
            }
        }

        Ok(rows)
    }

    pub fn contains(&self, file: &str) -> Result<bool, LedgerError> {
        Ok(self.load()?.iter().any(|row| row.file == file))
    }

    /// Appends `row` unless a row with the same filename key already
    /// exists. Returns `true` when the row was written, `false` for the
    /// already-saved no-op.
    pub fn save(&self, row: &SavedSummary) -> Result<bool, LedgerError> {
        if self.contains(&row.file)? {
            return Ok(false);
        }

        let mut line = serde_json::to_string(row)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::SummaryLedger;
    use crate::models::SavedSummary;
    use chrono::Utc;
    use std::fs;
    use tempfile::tempdir;

    fn row(file: &str) -> SavedSummary {
        SavedSummary {
            file: file.to_string(),
            title: "A Study".to_string(),
            summary: "Short summary.".to_string(),
            categories: vec!["Plant Biology".to_string(), "Other".to_string()],
            saved_at: Utc::now(),
        }
    }

    #[test]
    fn first_save_writes_second_is_a_noop() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let ledger = SummaryLedger::new(dir.path().join("saved.jsonl"));

        assert!(ledger.save(&row("a.pdf"))?);
        assert!(!ledger.save(&row("a.pdf"))?);

        let rows = ledger.load()?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].file, "a.pdf");
        Ok(())
    }

    #[test]
    fn missing_file_is_an_empty_ledger() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let ledger = SummaryLedger::new(dir.path().join("nope.jsonl"));
        assert!(ledger.load()?.is_empty());
        assert!(!ledger.contains("a.pdf")?);
        Ok(())
    }

    #[test]
    fn appends_preserve_prior_rows_verbatim() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("saved.jsonl");
        let ledger = SummaryLedger::new(&path);

        ledger.save(&row("a.pdf"))?;
        let first_line = fs::read_to_string(&path)?;
        ledger.save(&row("b.pdf"))?;
        let content = fs::read_to_string(&path)?;

        assert!(content.starts_with(&first_line));
        assert_eq!(ledger.load()?.len(), 2);
        Ok(())
    }

    #[test]
    fn malformed_lines_are_skipped_on_load() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("saved.jsonl");
        let ledger = SummaryLedger::new(&path);

        ledger.save(&row("a.pdf"))?;
        fs::write(
            &path,
            format!("{}not json at all\n", fs::read_to_string(&path)?),
        )?;
        ledger.save(&row("b.pdf"))?;

        let rows = ledger.load()?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].file, "a.pdf");
        assert_eq!(rows[1].file, "b.pdf");
        Ok(())
    }

    #[test]
    fn categories_round_trip_as_a_list() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let ledger = SummaryLedger::new(dir.path().join("saved.jsonl"));

        ledger.save(&row("a.pdf"))?;
        let rows = ledger.load()?;
        assert_eq!(rows[0].categories, vec!["Plant Biology", "Other"]);
        Ok(())
    }
}
