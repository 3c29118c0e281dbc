pub mod assistant;
pub mod cache;
pub mod categories;
pub mod corpus;
pub mod error;
pub mod extractor;
pub mod keywords;
pub mod ledger;
pub mod models;
pub mod search;
pub mod sections;
pub mod topics;

pub use assistant::{
    parse_metadata_response, AssistantConfig, HttpAssistant, ResearchAssistant, DEFAULT_ENDPOINT,
    DEFAULT_MODEL,
};
pub use cache::{Artifact, ArtifactCache, ArtifactKey, Operation};
pub use categories::{classify, CATEGORY_RULES, OTHER_CATEGORY};
pub use corpus::{CorpusReport, CorpusStore, SkippedPaper};
pub use error::{AssistantError, CorpusError, LedgerError, Result};
pub use extractor::{LopdfExtractor, PageText, PdfExtractor};
pub use keywords::{keyword_profile, top_keywords};
pub use ledger::SummaryLedger;
pub use models::{ExpandedSearch, MetadataOutcome, PaperMetadata, SavedSummary};
pub use search::{SearchEngine, SEARCH_PREFIX_CHARS};
pub use sections::{char_prefix, segment_sections, SECTION_HEADINGS, SECTION_WINDOW_CHARS};
pub use topics::{split_topic_list, NodeKind, TopicGraph, TopicNode};
