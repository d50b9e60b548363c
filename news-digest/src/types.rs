// Use the interfaces crate for core types
pub use interfaces::defs::{
    ArticleRecord, DeliveryTarget, Digest, QuerySpec, SortOrder, StageArtifact, TopicBlock,
    TopicSynopsis,
};

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "News-Digest/1.0".to_string(),
            timeout_seconds: 30,
            max_redirects: 5,
        }
    }
}

/// Which domain list produced a batch of articles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainTier {
    Preferred,
    Fallback,
}

impl std::fmt::Display for DomainTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainTier::Preferred => write!(f, "preferred sources"),
            DomainTier::Fallback => write!(f, "fallback sources"),
        }
    }
}

/// Result of the fallback resolver. Running out of news is a state, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedArticles {
    Found {
        tier: DomainTier,
        articles: Vec<ArticleRecord>,
    },
    NoArticles,
}

impl ResolvedArticles {
    pub fn len(&self) -> usize {
        match self {
            ResolvedArticles::Found { articles, .. } => articles.len(),
            ResolvedArticles::NoArticles => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_articles(self) -> Vec<ArticleRecord> {
        match self {
            ResolvedArticles::Found { articles, .. } => articles,
            ResolvedArticles::NoArticles => Vec::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("Article source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Text generation failed: {0}")]
    GenerationFailure(String),

    #[error("Missing configuration: {0}")]
    ConfigurationMissing(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, NewsError>;
