use crate::corpus::CorpusStore;
use crate::extractor::PdfExtractor;
use crate::models::MetadataOutcome;
use std::collections::HashMap;

/// The expensive per-document computations the cache memoizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ExtractText,
    Summary,
    Metadata,
    ExpandQuery,
}

/// Cache key: operation, document identity, and an optional parameter such
/// as a truncation length. Two calls share an entry only when all three
/// parts are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactKey {
    pub operation: Operation,
    pub document_id: String,
    pub param: Option<String>,
}

impl ArtifactKey {
    pub fn new(operation: Operation, document_id: impl Into<String>) -> Self {
        Self {
            operation,
            document_id: document_id.into(),
            param: None,
        }
    }

    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }
}

/// A memoized result. Collaborator failures are stored in the same shapes
/// as successes (an error-describing string, a failed metadata outcome).
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    Text(String),
    Metadata(MetadataOutcome),
    Keywords(Vec<String>),
}

impl Artifact {
    pub fn into_text(self) -> Option<String> {
        match self {
            Artifact::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn into_metadata(self) -> Option<MetadataOutcome> {
        match self {
            Artifact::Metadata(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn into_keywords(self) -> Option<Vec<String>> {
        match self {
            Artifact::Keywords(keywords) => Some(keywords),
            _ => None,
        }
    }
}

/// Unbounded per-run memo of derived artifacts. Entries are never evicted
/// and never re-validated against the underlying files; a cached failure
/// stays cached until the process ends or the caller varies the key.
#[derive(Debug, Default)]
pub struct ArtifactCache {
    entries: HashMap<ArtifactKey, Artifact>,
    hits: u64,
    misses: u64,
}

impl ArtifactCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored artifact for `key`, computing and storing it on
    /// first request. `compute` runs at most once per distinct key for the
    /// lifetime of the cache.
    pub fn get_or_compute(
        &mut self,
        key: ArtifactKey,
        compute: impl FnOnce() -> Artifact,
    ) -> Artifact {
        if let Some(found) = self.entries.get(&key) {
            self.hits += 1;
            return found.clone();
        }

        self.misses += 1;
        let value = compute();
        self.entries.insert(key, value.clone());
        value
    }

    /// Memoized full-text extraction for one corpus document.
    pub fn document_text<E: PdfExtractor>(
        &mut self,
        corpus: &CorpusStore<E>,
        document_id: &str,
    ) -> String {
        let key = ArtifactKey::new(Operation::ExtractText, document_id);
        self.get_or_compute(key, || Artifact::Text(corpus.extract_text(document_id)))
            .into_text()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::{Artifact, ArtifactCache, ArtifactKey, Operation};

    #[test]
    fn identical_keys_compute_exactly_once() {
        let mut cache = ArtifactCache::new();
        let mut calls = 0u32;

        for _ in 0..3 {
            let key = ArtifactKey::new(Operation::Summary, "a.pdf").with_param("8000");
            let artifact = cache.get_or_compute(key, || {
                calls += 1;
                Artifact::Text("a summary".to_string())
            });
            assert_eq!(artifact, Artifact::Text("a summary".to_string()));
        }

        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 2);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn a_different_param_is_a_different_key() {
        let mut cache = ArtifactCache::new();
        let mut calls = 0u32;

        for param in ["2000", "8000", "2000"] {
            let key = ArtifactKey::new(Operation::Summary, "a.pdf").with_param(param);
            cache.get_or_compute(key, || {
                calls += 1;
                Artifact::Text(format!("summary at {param}"))
            });
        }

        assert_eq!(calls, 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn operations_do_not_collide_on_the_same_document() {
        let mut cache = ArtifactCache::new();

        cache.get_or_compute(ArtifactKey::new(Operation::Summary, "a.pdf"), || {
            Artifact::Text("summary".to_string())
        });
        let text = cache.get_or_compute(ArtifactKey::new(Operation::ExtractText, "a.pdf"), || {
            Artifact::Text("full text".to_string())
        });

        assert_eq!(text, Artifact::Text("full text".to_string()));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failure_strings_are_memoized_like_values() {
        let mut cache = ArtifactCache::new();
        let mut calls = 0u32;

        for _ in 0..2 {
            let key = ArtifactKey::new(Operation::Summary, "flaky.pdf");
            let artifact = cache.get_or_compute(key, || {
                calls += 1;
                Artifact::Text("Error generating summary: timeout".to_string())
            });
            assert_eq!(
                artifact,
                Artifact::Text("Error generating summary: timeout".to_string())
            );
        }

        assert_eq!(calls, 1);
    }
}
