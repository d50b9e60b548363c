use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One article as returned by an article source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub description: Option<String>,
    pub source_name: Option<String>,
    pub url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    PublishedAt,
}

impl SortOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::PublishedAt => "publishedAt",
        }
    }
}

/// Search parameters for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub query_terms: Vec<String>,
    pub domain_allow_list: Vec<String>,
    pub language: String,
    pub sort_order: SortOrder,
    pub page_size: u32,
    pub from: Option<NaiveDate>,
}

impl QuerySpec {
    pub fn new<I, S>(query_terms: I, language: &str, page_size: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut terms: Vec<String> = Vec::new();
        for term in query_terms {
            let term: String = term.into();
            let term = term.trim();
            if !term.is_empty() && !terms.iter().any(|t| t == term) {
                terms.push(term.to_string());
            }
        }

        Self {
            query_terms: terms,
            domain_allow_list: Vec::new(),
            language: language.to_string(),
            sort_order: SortOrder::PublishedAt,
            page_size,
            from: None,
        }
    }

    pub fn with_from(mut self, from: Option<NaiveDate>) -> Self {
        self.from = from;
        self
    }

    /// Copy of this query that differs only in its domain allow-list.
    pub fn with_domains(&self, domains: &[String]) -> Self {
        Self {
            domain_allow_list: domains.to_vec(),
            ..self.clone()
        }
    }

    /// Keyword filter in the OR-combined form search providers accept.
    pub fn keyword_filter(&self) -> String {
        self.query_terms.join(" OR ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSynopsis {
    pub topic: String,
    pub synopsis: String,
}

/// Output of the research stage, handed to the refinement stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageArtifact {
    Topics(Vec<TopicSynopsis>),
    NoTopicsFound,
}

impl StageArtifact {
    pub fn topic_count(&self) -> usize {
        match self {
            StageArtifact::Topics(topics) => topics.len(),
            StageArtifact::NoTopicsFound => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicBlock {
    pub title: String,
    pub bullets: Vec<String>,
}

/// Final plain-text digest.
///
/// `Display` renders the delivered text: each topic is a title line followed
/// by `- ` bullets, topics separated by a blank line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Digest {
    Topics(Vec<TopicBlock>),
    NoNews { message: String },
}

impl Digest {
    pub fn is_no_news(&self) -> bool {
        matches!(self, Digest::NoNews { .. })
    }

    pub fn blocks(&self) -> &[TopicBlock] {
        match self {
            Digest::Topics(blocks) => blocks,
            Digest::NoNews { .. } => &[],
        }
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Digest::NoNews { message } => write!(f, "{}", message),
            Digest::Topics(blocks) => {
                for (i, block) in blocks.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                        writeln!(f)?;
                    }
                    write!(f, "{}", block.title)?;
                    for bullet in &block.bullets {
                        write!(f, "\n- {}", bullet)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Channel the side-channel delivery process posts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryTarget {
    pub group_id: String,
}

// Object style note:
// Collaborators (article sources, text generators) live in the news-digest
// crate behind traits. Everything here is plain data that is created once
// and moved from stage to stage.
