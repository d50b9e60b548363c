use crate::traits::ArticleSource;
use crate::types::{ArticleRecord, DomainTier, NewsError, QuerySpec, ResolvedArticles, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Queries the preferred domains first and falls back to a broader set only
/// when the preferred set yields nothing.
///
/// `SourceUnavailable` on either attempt counts as an empty attempt. Any
/// other error is propagated.
pub struct FallbackResolver {
    source: Arc<dyn ArticleSource>,
}

impl FallbackResolver {
    pub fn new(source: Arc<dyn ArticleSource>) -> Self {
        Self { source }
    }

    pub async fn resolve_articles(
        &self,
        base_query: &QuerySpec,
        preferred_domains: &[String],
        fallback_domains: &[String],
    ) -> Result<ResolvedArticles> {
        let preferred = self
            .attempt(base_query, preferred_domains, DomainTier::Preferred)
            .await?;
        if !preferred.is_empty() {
            return Ok(ResolvedArticles::Found {
                tier: DomainTier::Preferred,
                articles: preferred,
            });
        }

        let fallback = self
            .attempt(base_query, fallback_domains, DomainTier::Fallback)
            .await?;
        if !fallback.is_empty() {
            return Ok(ResolvedArticles::Found {
                tier: DomainTier::Fallback,
                articles: fallback,
            });
        }

        info!("No articles found from preferred or fallback sources");
        Ok(ResolvedArticles::NoArticles)
    }

    async fn attempt(
        &self,
        base_query: &QuerySpec,
        domains: &[String],
        tier: DomainTier,
    ) -> Result<Vec<ArticleRecord>> {
        let query = base_query.with_domains(domains);

        match self.source.fetch(&query).await {
            Ok(articles) if articles.is_empty() => {
                info!("No articles found from {} ({})", tier, domains.join(","));
                Ok(articles)
            }
            Ok(articles) => {
                info!("Found {} articles from {}", articles.len(), tier);
                Ok(articles)
            }
            Err(NewsError::SourceUnavailable(reason)) => {
                warn!(
                    "{} unavailable for {}, treating as empty: {}",
                    self.source.source_name(),
                    tier,
                    reason
                );
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}
