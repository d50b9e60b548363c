use crate::prompt::GenerationRequest;
use crate::types::{ArticleRecord, QuerySpec, Result};
use async_trait::async_trait;

/// Trait for pulling articles from a search or news provider
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Human-readable name for this source
    fn source_name(&self) -> String;

    /// Fetch at most `query.page_size` articles matching the query.
    /// Unreachable or malformed upstream responses are `NewsError::SourceUnavailable`.
    async fn fetch(&self, query: &QuerySpec) -> Result<Vec<ArticleRecord>>;
}

/// Trait for the text-generation backend used by both pipeline stages
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn generator_name(&self) -> String;

    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}
