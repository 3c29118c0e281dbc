use crate::assistant::ResearchAssistant;
use crate::cache::{Artifact, ArtifactCache, ArtifactKey, Operation};
use crate::corpus::CorpusStore;
use crate::extractor::PdfExtractor;
use crate::models::ExpandedSearch;
use crate::sections::char_prefix;
use tracing::warn;

/// How much of a document's extracted text is scanned for a match.
pub const SEARCH_PREFIX_CHARS: usize = 5_000;

/// Read-only search over the corpus. Text extraction goes through the
/// shared artifact cache, so repeated searches only pay for each document
/// once.
pub struct SearchEngine<'a, A, E = crate::extractor::LopdfExtractor>
where
    A: ResearchAssistant,
    E: PdfExtractor,
{
    corpus: &'a CorpusStore<E>,
    assistant: &'a A,
}

impl<'a, A, E> SearchEngine<'a, A, E>
where
    A: ResearchAssistant,
    E: PdfExtractor,
{
    pub fn new(corpus: &'a CorpusStore<E>, assistant: &'a A) -> Self {
        Self { corpus, assistant }
    }

    /// Documents whose filename or leading text contains `keyword`,
    /// case-insensitively, in corpus listing order.
    pub fn search(&self, cache: &mut ArtifactCache, keyword: &str) -> Vec<String> {
        let needle = keyword.to_lowercase();
        self.corpus
            .list()
            .into_iter()
            .filter(|file| self.matches(cache, file, &needle))
            .collect()
    }

    /// Expands `query` into derived keywords through the assistant, then
    /// returns documents matching any of them. A failed or empty expansion
    /// degrades to a literal search on the query itself.
    pub fn search_expanded(&self, cache: &mut ArtifactCache, query: &str) -> ExpandedSearch {
        let keywords = self.expansion_keywords(cache, query);
        let needles: Vec<String> = keywords.iter().map(|word| word.to_lowercase()).collect();

        let matches = self
            .corpus
            .list()
            .into_iter()
            .filter(|file| {
                needles
                    .iter()
                    .any(|needle| self.matches(cache, file, needle))
            })
            .collect();

        ExpandedSearch { keywords, matches }
    }

    fn matches(&self, cache: &mut ArtifactCache, file: &str, needle: &str) -> bool {
        if file.to_lowercase().contains(needle) {
            return true;
        }

        let text = cache.document_text(self.corpus, file);
        char_prefix(&text, SEARCH_PREFIX_CHARS)
            .to_lowercase()
            .contains(needle)
    }

    fn expansion_keywords(&self, cache: &mut ArtifactCache, query: &str) -> Vec<String> {
        let key = ArtifactKey::new(Operation::ExpandQuery, query);
        cache
            .get_or_compute(key, || {
                let keywords = match self.assistant.expand_query(query) {
                    Ok(keywords) if !keywords.is_empty() => keywords,
                    Ok(_) => vec![query.to_string()],
                    Err(error) => {
                        warn!(query, error = %error, "query expansion failed, using literal query");
                        vec![query.to_string()]
                    }
                };
                Artifact::Keywords(keywords)
            })
            .into_keywords()
            .unwrap_or_else(|| vec![query.to_string()])
    }
}
