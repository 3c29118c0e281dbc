use chrono::Utc;
use clap::{Parser, Subcommand};
use paper_corpus_core::{
    char_prefix, classify, keyword_profile, segment_sections, split_topic_list, top_keywords,
    Artifact, ArtifactCache, ArtifactKey, AssistantConfig, CorpusStore, HttpAssistant,
    MetadataOutcome, Operation, ResearchAssistant, SavedSummary, SearchEngine, SummaryLedger,
    TopicGraph, DEFAULT_ENDPOINT, DEFAULT_MODEL, SECTION_WINDOW_CHARS,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "paper-corpus", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory holding the PDF corpus
    #[arg(long, default_value = "papers")]
    papers_dir: String,

    /// Ledger file for saved summaries
    #[arg(long, default_value = "saved_summaries.jsonl")]
    ledger: String,

    /// Assistant endpoint base URL
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    assistant_endpoint: String,

    /// Assistant model name
    #[arg(long, default_value = DEFAULT_MODEL)]
    assistant_model: String,

    /// Assistant API key
    #[arg(long, env = "ASSISTANT_API_KEY")]
    assistant_api_key: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// List the papers in the corpus.
    List,
    /// Extract every paper and print corpus-wide keywords and categories.
    Overview {
        /// Number of corpus keywords to print.
        #[arg(long, default_value = "15")]
        top: usize,
    },
    /// Search the corpus for a keyword.
    Search {
        /// Search query
        query: String,
        /// Expand the query into derived keywords first.
        #[arg(long, default_value_t = false)]
        expand: bool,
    },
    /// Print the recognized sections of one paper.
    Sections {
        /// Paper filename
        file: String,
    },
    /// Print the most frequent keywords of one paper.
    Keywords {
        /// Paper filename
        file: String,
        /// Number of keywords to print.
        #[arg(long, default_value = "10")]
        top: usize,
    },
    /// Generate an AI summary of one paper.
    Summarize {
        /// Paper filename
        file: String,
        /// Characters of text sent to the assistant.
        #[arg(long, default_value = "8000")]
        max_chars: usize,
    },
    /// Extract structured AI metadata for one paper.
    Metadata {
        /// Paper filename
        file: String,
        /// Characters of text sent to the assistant.
        #[arg(long, default_value = "8000")]
        max_chars: usize,
    },
    /// Persist a paper's summary and categories to the ledger.
    Save {
        /// Paper filename
        file: String,
        /// Characters of text sent to the assistant.
        #[arg(long, default_value = "8000")]
        max_chars: usize,
    },
    /// Build a document-topic graph over a search result set.
    Graph {
        /// Search query selecting the documents.
        query: String,
        /// Expand the query into derived keywords first.
        #[arg(long, default_value_t = false)]
        expand: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    let corpus = CorpusStore::new(&cli.papers_dir);
    let ledger = SummaryLedger::new(&cli.ledger);
    let mut config = AssistantConfig::new(&cli.assistant_endpoint, &cli.assistant_model);
    if let Some(api_key) = &cli.assistant_api_key {
        config = config.with_api_key(api_key);
    }
    let assistant = HttpAssistant::new(config)?;
    let mut cache = ArtifactCache::new();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        papers_dir = %cli.papers_dir,
        "paper-corpus boot"
    );

    match cli.command {
        Command::List => {
            let files = corpus.list();
            if files.is_empty() {
                println!("no papers found in {}", cli.papers_dir);
            }
            for file in files {
                println!("{file}");
            }
        }
        Command::Overview { top } => {
            let report = corpus.extract_all();
            for skipped in &report.skipped {
                warn!(file = %skipped.file, reason = %skipped.reason, "skipped paper");
            }

            println!("{} papers read, {} skipped", report.texts.len(), report.skipped.len());

            let profile =
                keyword_profile(report.texts.iter().map(|(_, text)| text.as_str()), top)?;
            println!("corpus keywords:");
            for (keyword, count) in profile {
                println!("  {keyword}: {count}");
            }

            for (file, text) in &report.texts {
                println!("{file}: {}", classify(text).join(", "));
            }
        }
        Command::Search { query, expand } => {
            let engine = SearchEngine::new(&corpus, &assistant);
            if expand {
                let result = engine.search_expanded(&mut cache, &query);
                println!("derived keywords: {}", result.keywords.join(", "));
                print_matches(&query, &result.matches);
            } else {
                let matches = engine.search(&mut cache, &query);
                print_matches(&query, &matches);
            }
        }
        Command::Sections { file } => {
            let text = cache.document_text(&corpus, &file);
            let sections = segment_sections(&text);
            if sections.is_empty() {
                println!("no recognizable sections in {file}");
            }
            for (heading, snippet) in sections {
                println!("== {heading} ==\n{snippet}\n");
            }
        }
        Command::Keywords { file, top } => {
            let text = cache.document_text(&corpus, &file);
            for (keyword, count) in top_keywords(&text, top)? {
                println!("{keyword}: {count}");
            }
        }
        Command::Summarize { file, max_chars } => {
            let summary = cached_summary(&mut cache, &corpus, &assistant, &file, max_chars);
            println!("{summary}");
        }
        Command::Metadata { file, max_chars } => {
            let outcome = cached_metadata(&mut cache, &corpus, &assistant, &file, max_chars);
            match outcome {
                MetadataOutcome::Parsed(metadata) => {
                    println!("{}", serde_json::to_string_pretty(&metadata)?)
                }
                MetadataOutcome::Unparsed { raw } => println!("{raw}"),
                MetadataOutcome::Failed { reason } => println!("metadata unavailable: {reason}"),
            }
        }
        Command::Save { file, max_chars } => {
            let summary = cached_summary(&mut cache, &corpus, &assistant, &file, max_chars);
            let outcome = cached_metadata(&mut cache, &corpus, &assistant, &file, max_chars);
            let title = outcome.title().unwrap_or(file.as_str()).to_string();
            let text = cache.document_text(&corpus, &file);

            let row = SavedSummary {
                file: file.clone(),
                title,
                summary,
                categories: classify(&text),
                saved_at: Utc::now(),
            };

            if ledger.save(&row)? {
                println!("saved {file} to {}", ledger.path().display());
            } else {
                println!("{file} already saved");
            }
        }
        Command::Graph { query, expand } => {
            let engine = SearchEngine::new(&corpus, &assistant);
            let matches = if expand {
                engine.search_expanded(&mut cache, &query).matches
            } else {
                engine.search(&mut cache, &query)
            };

            let mut document_topics = Vec::new();
            for file in matches {
                let topics = paper_topics(&mut cache, &corpus, &assistant, &file);
                if topics.is_empty() {
                    warn!(file = %file, "no topics derived, leaving paper out of the graph");
                    continue;
                }
                document_topics.push((file, topics));
            }

            let graph = TopicGraph::build(&document_topics);
            println!(
                "{} nodes, {} edges",
                graph.node_count(),
                graph.edge_count()
            );
            for (index, node) in graph.nodes().iter().enumerate() {
                println!(
                    "{:?} {}: {}",
                    node.kind,
                    node.label,
                    graph.neighbors(index).join(", ")
                );
            }
        }
    }

    Ok(())
}

fn print_matches(query: &str, matches: &[String]) {
    if matches.is_empty() {
        println!("no papers matched '{query}'");
        return;
    }
    println!("{} papers matched '{query}':", matches.len());
    for file in matches {
        println!("  {file}");
    }
}

/// Summary memoized under (Summary, file, max_chars); assistant failures
/// are folded into the conventional error string and cached with it.
fn cached_summary(
    cache: &mut ArtifactCache,
    corpus: &CorpusStore,
    assistant: &HttpAssistant,
    file: &str,
    max_chars: usize,
) -> String {
    let text = cache.document_text(corpus, file);
    let key = ArtifactKey::new(Operation::Summary, file).with_param(max_chars.to_string());

    cache
        .get_or_compute(key, || {
            let excerpt = char_prefix(&text, max_chars);
            let summary = match assistant.summarize(excerpt, None) {
                Ok(summary) => summary,
                Err(error) => format!("Error generating summary: {error}"),
            };
            Artifact::Text(summary)
        })
        .into_text()
        .unwrap_or_default()
}

fn cached_metadata(
    cache: &mut ArtifactCache,
    corpus: &CorpusStore,
    assistant: &HttpAssistant,
    file: &str,
    max_chars: usize,
) -> MetadataOutcome {
    let text = cache.document_text(corpus, file);
    let key = ArtifactKey::new(Operation::Metadata, file).with_param(max_chars.to_string());

    cache
        .get_or_compute(key, || {
            let excerpt = char_prefix(&text, max_chars);
            Artifact::Metadata(assistant.extract_metadata(excerpt))
        })
        .into_metadata()
        .unwrap_or_else(|| MetadataOutcome::Failed {
            reason: "cache returned a non-metadata artifact".to_string(),
        })
}

/// Topic list for one paper, derived from its abstract-length excerpt:
/// parsed metadata contributes its keyword list, unparsed responses are
/// split best-effort, failures yield no topics.
fn paper_topics(
    cache: &mut ArtifactCache,
    corpus: &CorpusStore,
    assistant: &HttpAssistant,
    file: &str,
) -> Vec<String> {
    let outcome = cached_metadata(cache, corpus, assistant, file, SECTION_WINDOW_CHARS);
    match outcome {
        MetadataOutcome::Parsed(metadata) => {
            if metadata.keywords.is_empty() {
                split_topic_list(&metadata.main_topic)
            } else {
                metadata.keywords
            }
        }
        MetadataOutcome::Unparsed { raw } => split_topic_list(&raw),
        MetadataOutcome::Failed { reason } => {
            warn!(file, reason = %reason, "metadata extraction failed");
            Vec::new()
        }
    }
}
