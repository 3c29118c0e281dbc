use crate::extractor::{LopdfExtractor, PdfExtractor};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// A paper that could not be read during a corpus sweep.
#[derive(Debug)]
pub struct SkippedPaper {
    pub file: String,
    pub reason: String,
}

/// Best-effort whole-corpus extraction result.
#[derive(Debug, Default)]
pub struct CorpusReport {
    pub texts: Vec<(String, String)>,
    pub skipped: Vec<SkippedPaper>,
}

/// Local directory of PDF papers. Document identity is the filename,
/// unique within the directory.
pub struct CorpusStore<E = LopdfExtractor> {
    dir: PathBuf,
    extractor: E,
}

impl CorpusStore<LopdfExtractor> {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_extractor(dir, LopdfExtractor)
    }
}

impl<E: PdfExtractor> CorpusStore<E> {
    pub fn with_extractor(dir: impl Into<PathBuf>, extractor: E) -> Self {
        Self {
            dir: dir.into(),
            extractor,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Filenames of all PDFs directly inside the corpus directory, sorted
    /// lexicographically. A missing or unreadable directory yields an
    /// empty listing, never an error.
    pub fn list(&self) -> Vec<String> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|item| item.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let is_pdf = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

            if !is_pdf {
                continue;
            }

            if let Some(name) = entry.file_name().to_str() {
                files.push(name.to_string());
            }
        }

        files.sort_unstable();
        files
    }

    /// Full text of one paper: page texts joined with newlines, pages
    /// without readable text skipped. Read or parse failures degrade to an
    /// empty string so one corrupt file never breaks a broader operation.
    pub fn extract_text(&self, file: &str) -> String {
        let path = self.path_of(file);
        match self.extractor.extract_pages(&path) {
            Ok(pages) => pages
                .into_iter()
                .map(|page| page.text)
                .collect::<Vec<_>>()
                .join("\n"),
            Err(error) => {
                warn!(file, error = %error, "text extraction failed");
                String::new()
            }
        }
    }

    /// Extracts every listed paper, collecting unreadable ones with their
    /// failure reason instead of aborting.
    pub fn extract_all(&self) -> CorpusReport {
        let mut report = CorpusReport::default();

        for file in self.list() {
            match self.extractor.extract_pages(&self.path_of(&file)) {
                Ok(pages) => {
                    let text = pages
                        .into_iter()
                        .map(|page| page.text)
                        .collect::<Vec<_>>()
                        .join("\n");
                    report.texts.push((file, text));
                }
                Err(error) => report.skipped.push(SkippedPaper {
                    file,
                    reason: error.to_string(),
                }),
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::CorpusStore;
    use crate::error::CorpusError;
    use crate::extractor::{PageText, PdfExtractor};
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    struct FakeExtractor {
        pages: HashMap<String, Vec<PageText>>,
    }

    impl FakeExtractor {
        fn with_text(entries: &[(&str, &str)]) -> Self {
            let pages = entries
                .iter()
                .map(|(file, text)| {
                    (
                        (*file).to_string(),
                        vec![PageText {
                            number: 1,
                            text: (*text).to_string(),
                        }],
                    )
                })
                .collect();
            Self { pages }
        }
    }

    impl PdfExtractor for FakeExtractor {
        fn extract_pages(&self, path: &Path) -> Result<Vec<PageText>, CorpusError> {
            let name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default();
            self.pages
                .get(name)
                .cloned()
                .ok_or_else(|| CorpusError::PdfParse(format!("no fake pages for {name}")))
        }
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"%PDF-1.4\n%fake").expect("write test file");
    }

    #[test]
    fn listing_a_missing_directory_is_empty() {
        let corpus = CorpusStore::new("/definitely/not/a/real/path");
        assert!(corpus.list().is_empty());
    }

    #[test]
    fn listing_is_sorted_and_filtered_by_extension() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        touch(dir.path(), "b_paper.pdf");
        touch(dir.path(), "a_paper.pdf");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "upper.PDF");
        fs::create_dir(dir.path().join("nested"))?;
        touch(&dir.path().join("nested"), "deep.pdf");

        let corpus = CorpusStore::new(dir.path());
        assert_eq!(corpus.list(), vec!["a_paper.pdf", "b_paper.pdf", "upper.PDF"]);
        Ok(())
    }

    #[test]
    fn extraction_joins_pages_with_newlines() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        touch(dir.path(), "two_pages.pdf");

        let extractor = FakeExtractor {
            pages: HashMap::from([(
                "two_pages.pdf".to_string(),
                vec![
                    PageText {
                        number: 1,
                        text: "first page".to_string(),
                    },
                    PageText {
                        number: 2,
                        text: "second page".to_string(),
                    },
                ],
            )]),
        };

        let corpus = CorpusStore::with_extractor(dir.path(), extractor);
        assert_eq!(corpus.extract_text("two_pages.pdf"), "first page\nsecond page");
        Ok(())
    }

    #[test]
    fn unreadable_papers_extract_to_empty_text() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        touch(dir.path(), "broken.pdf");

        let corpus = CorpusStore::new(dir.path());
        assert_eq!(corpus.extract_text("broken.pdf"), "");
        assert_eq!(corpus.list(), vec!["broken.pdf"]);
        Ok(())
    }

    #[test]
    fn corpus_sweep_collects_skip_reasons() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        touch(dir.path(), "good.pdf");
        touch(dir.path(), "bad.pdf");

        let extractor = FakeExtractor::with_text(&[("good.pdf", "plant growth in orbit")]);
        let corpus = CorpusStore::with_extractor(dir.path(), extractor);
        let report = corpus.extract_all();

        assert_eq!(report.texts.len(), 1);
        assert_eq!(report.texts[0].0, "good.pdf");
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].file, "bad.pdf");
        Ok(())
    }
}
