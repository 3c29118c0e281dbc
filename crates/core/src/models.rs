use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured metadata the assistant extracts from a paper's text.
///
/// Field names follow the assistant's JSON contract, so a response like
/// `{"Title": "...", "Organisms": [...]}` deserializes directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct PaperMetadata {
    pub title: String,
    pub year: Option<i32>,
    pub authors: Vec<String>,
    pub keywords: Vec<String>,
    pub organisms: Vec<String>,
    pub methods: Vec<String>,
    pub main_topic: String,
    pub key_findings: Vec<String>,
    pub conclusions: String,
}

/// The three shapes a metadata extraction can come back in: a parsed
/// object, the raw response when it was not valid JSON, or a failure
/// description when the assistant could not be reached at all.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetadataOutcome {
    Parsed(PaperMetadata),
    Unparsed { raw: String },
    Failed { reason: String },
}

impl MetadataOutcome {
    pub fn title(&self) -> Option<&str> {
        match self {
            MetadataOutcome::Parsed(metadata) if !metadata.title.trim().is_empty() => {
                Some(metadata.title.as_str())
            }
            _ => None,
        }
    }
}

/// One persisted ledger row. `file` is the document identity and the
/// ledger's uniqueness key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedSummary {
    pub file: String,
    pub title: String,
    pub summary: String,
    pub categories: Vec<String>,
    pub saved_at: DateTime<Utc>,
}

/// Result of an expansion-backed search: the derived keywords that were
/// matched and the documents any of them hit, in corpus listing order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpandedSearch {
    pub keywords: Vec<String>,
    pub matches: Vec<String>,
}
