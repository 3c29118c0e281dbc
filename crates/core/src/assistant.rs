use crate::error::AssistantError;
use crate::models::{MetadataOutcome, PaperMetadata};
use crate::topics::split_topic_list;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use url::Url;

/// Boundary to the generative-AI collaborator. The underlying service
/// signals failure through plain strings; this trait re-exposes it with a
/// typed contract so callers can tell content from errors.
pub trait ResearchAssistant {
    fn summarize(&self, text: &str, title: Option<&str>) -> Result<String, AssistantError>;

    fn extract_metadata(&self, text: &str) -> MetadataOutcome;

    fn expand_query(&self, query: &str) -> Result<Vec<String>, AssistantError>;
}

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
}

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";

impl AssistantConfig {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            model: model.into(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Reads `ASSISTANT_ENDPOINT`, `ASSISTANT_MODEL`, and
    /// `ASSISTANT_API_KEY`, falling back to the public defaults for the
    /// first two. Returns `None` when no key is set.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("ASSISTANT_API_KEY")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())?;

        let endpoint = std::env::var("ASSISTANT_ENDPOINT")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let model = std::env::var("ASSISTANT_MODEL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Some(Self::new(endpoint, model).with_api_key(api_key))
    }
}

#[derive(Debug, Clone, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Clone, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Clone, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(&self) -> Option<String> {
        let candidates = self.candidates.as_ref()?;
        for candidate in candidates {
            let Some(content) = &candidate.content else {
                continue;
            };
            let Some(parts) = &content.parts else {
                continue;
            };
            for part in parts {
                if let Some(text) = &part.text {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        return Some(trimmed.to_string());
                    }
                }
            }
        }
        None
    }
}

/// Blocking HTTP client for a `generateContent`-style endpoint.
pub struct HttpAssistant {
    client: Client,
    config: AssistantConfig,
}

impl HttpAssistant {
    pub fn new(config: AssistantConfig) -> Result<Self, AssistantError> {
        Url::parse(&config.endpoint)?;
        Ok(Self {
            client: Client::new(),
            config,
        })
    }

    fn generate(&self, prompt: &str) -> Result<String, AssistantError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        );

        let payload = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let mut request = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .json(&payload);

        if let Some(api_key) = &self.config.api_key {
            request = request.header("x-goog-api-key", api_key);
        }

        let response = request.send()?;

        if !response.status().is_success() {
            return Err(AssistantError::Endpoint {
                status: response.status().to_string(),
                details: response.text().unwrap_or_default(),
            });
        }

        let payload: GenerateResponse = response.json()?;
        payload.first_text().ok_or(AssistantError::EmptyResponse)
    }
}

impl ResearchAssistant for HttpAssistant {
    fn summarize(&self, text: &str, title: Option<&str>) -> Result<String, AssistantError> {
        self.generate(&summary_prompt(text, title))
    }

    fn extract_metadata(&self, text: &str) -> MetadataOutcome {
        match self.generate(&metadata_prompt(text)) {
            Ok(raw) => parse_metadata_response(&raw),
            Err(error) => MetadataOutcome::Failed {
                reason: error.to_string(),
            },
        }
    }

    fn expand_query(&self, query: &str) -> Result<Vec<String>, AssistantError> {
        let raw = self.generate(&expansion_prompt(query))?;
        let keywords = split_topic_list(&raw);
        if keywords.is_empty() {
            return Err(AssistantError::EmptyResponse);
        }
        Ok(keywords)
    }
}

fn summary_prompt(text: &str, title: Option<&str>) -> String {
    let mut prompt = String::from(
        "Summarize this space biology study for a general audience. \
         Focus on the experiment goal, biological context, and results.\n\n",
    );
    if let Some(title) = title {
        prompt.push_str(&format!("Title: {title}\n\n"));
    }
    prompt.push_str(text);
    prompt
}

fn metadata_prompt(text: &str) -> String {
    format!(
        "Extract metadata from this research paper and answer with a single \
         JSON object holding the keys Title, Year, Authors, Keywords, \
         Organisms, Methods, MainTopic, KeyFindings, and Conclusions. \
         Authors, Keywords, Organisms, Methods, and KeyFindings are arrays \
         of strings; Year is a number.\n\n{text}"
    )
}

fn expansion_prompt(query: &str) -> String {
    format!(
        "List up to five short search keywords related to this query, one \
         per line, with no numbering or extra prose.\n\nQuery: {query}"
    )
}

/// Best-effort parse of a metadata response: strict JSON first (with any
/// markdown code fence stripped), otherwise the raw text is carried
/// through as [`MetadataOutcome::Unparsed`]. Never fails.
pub fn parse_metadata_response(raw: &str) -> MetadataOutcome {
    let body = strip_code_fence(raw);
    match serde_json::from_str::<PaperMetadata>(body) {
        Ok(metadata) => MetadataOutcome::Parsed(metadata),
        Err(_) => MetadataOutcome::Unparsed {
            raw: raw.to_string(),
        },
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let rest = match rest.split_once('\n') {
        Some((_language, body)) => body,
        None => rest,
    };
    rest.trim_end_matches('`').trim()
}
