use crate::processing::{clamp_topics, RefinementStage, ResearchStage, DEFAULT_MAX_TOPICS};
use crate::sources::FallbackResolver;
use crate::traits::{ArticleSource, TextGenerator};
use crate::types::{Digest, NewsError, QuerySpec, ResolvedArticles, Result};
use chrono::NaiveDate;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

pub const PREFERRED_DOMAINS: [&str; 1] = ["artificialintelligence-news.com"];

pub const FALLBACK_DOMAINS: [&str; 5] = [
    "techcrunch.com",
    "venturebeat.com",
    "theverge.com",
    "wired.com",
    "technologyreview.com",
];

/// Everything that distinguishes one digest flavour from another
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineProfile {
    pub name: String,
    pub query_terms: Vec<String>,
    pub preferred_domains: Vec<String>,
    pub fallback_domains: Vec<String>,
    pub language: String,
    pub page_size: u32,
    pub from: Option<NaiveDate>,
    pub max_topics: usize,
    pub no_news_message: String,
}

impl PipelineProfile {
    /// LLMs, retrieval-augmented generation and agents
    pub fn agents() -> Self {
        Self {
            name: "agents".to_string(),
            query_terms: to_strings(&[
                "LLM",
                "large language models",
                "retrieval augmented generation",
                "RAG",
                "AI agents",
                "autonomous agents",
            ]),
            preferred_domains: to_strings(&PREFERRED_DOMAINS),
            fallback_domains: to_strings(&FALLBACK_DOMAINS),
            language: "en".to_string(),
            page_size: 5,
            from: None,
            max_topics: DEFAULT_MAX_TOPICS,
            no_news_message: "No recent news found related to LLMs, RAG, or agents.".to_string(),
        }
    }

    /// Broad artificial intelligence and machine learning coverage
    pub fn general() -> Self {
        Self {
            name: "general".to_string(),
            query_terms: to_strings(&[
                "AI",
                "artificial intelligence",
                "machine learning",
                "deep learning",
                "generative AI",
                "LLM",
                "NLP",
            ]),
            no_news_message: "No recent news found related to artificial intelligence.".to_string(),
            ..Self::agents()
        }
    }

    pub fn with_from(mut self, from: Option<NaiveDate>) -> Self {
        self.from = from;
        self
    }

    pub fn with_max_topics(mut self, max_topics: usize) -> Self {
        self.max_topics = clamp_topics(max_topics);
        self
    }

    /// Base query for one run; the resolver fills in the domain list.
    pub fn base_query(&self) -> QuerySpec {
        QuerySpec::new(self.query_terms.iter().cloned(), &self.language, self.page_size)
            .with_from(self.from)
    }
}

impl Default for PipelineProfile {
    fn default() -> Self {
        Self::agents()
    }
}

impl FromStr for PipelineProfile {
    type Err = NewsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "agents" => Ok(Self::agents()),
            "general" => Ok(Self::general()),
            other => Err(NewsError::General(format!(
                "Unknown profile '{}' (expected 'agents' or 'general')",
                other
            ))),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Research → refine pipeline over injected collaborators
pub struct NewsPipeline {
    profile: PipelineProfile,
    resolver: FallbackResolver,
    research: ResearchStage,
    refinement: RefinementStage,
}

impl NewsPipeline {
    pub fn new(
        profile: PipelineProfile,
        source: Arc<dyn ArticleSource>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let research = ResearchStage::new(generator.clone(), profile.max_topics);
        let refinement =
            RefinementStage::new(generator, profile.max_topics, profile.no_news_message.clone());

        Self {
            resolver: FallbackResolver::new(source),
            research,
            refinement,
            profile,
        }
    }

    pub fn profile(&self) -> &PipelineProfile {
        &self.profile
    }

    /// Resolve articles with the preferred → fallback domain policy.
    pub async fn resolve(&self) -> Result<ResolvedArticles> {
        let query = self.profile.base_query();
        self.resolver
            .resolve_articles(
                &query,
                &self.profile.preferred_domains,
                &self.profile.fallback_domains,
            )
            .await
    }

    /// Run the whole chain once. Either a complete digest or a single error comes back.
    pub async fn run(&self) -> Result<Digest> {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline_run", %run_id, profile = %self.profile.name);

        async {
            info!("Starting pipeline run");

            let resolved = self.resolve().await?;
            info!("Resolved {} articles", resolved.len());

            let artifact = self
                .research
                .summarize_topics(resolved.into_articles())
                .await
                .map_err(|e| {
                    error!("{} stage failed: {}", self.research.stage_name(), e);
                    e
                })?;

            let digest = self.refinement.refine(artifact).await.map_err(|e| {
                error!("{} stage failed: {}", self.refinement.stage_name(), e);
                e
            })?;

            if digest.is_no_news() {
                info!("Pipeline run finished without news");
            } else {
                info!(
                    "Pipeline run finished with {} topic blocks",
                    digest.blocks().len()
                );
            }
            Ok(digest)
        }
        .instrument(span)
        .await
    }
}

/// Builder for wiring collaborators into a pipeline
pub struct PipelineBuilder {
    profile: PipelineProfile,
    source: Option<Arc<dyn ArticleSource>>,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            profile: PipelineProfile::default(),
            source: None,
            generator: None,
        }
    }

    pub fn profile(mut self, profile: PipelineProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn source(mut self, source: Arc<dyn ArticleSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn build(self) -> Result<NewsPipeline> {
        let source = self.source.ok_or_else(|| {
            NewsError::ConfigurationMissing("pipeline has no article source".to_string())
        })?;
        let generator = self.generator.ok_or_else(|| {
            NewsError::ConfigurationMissing("pipeline has no text generator".to_string())
        })?;
        Ok(NewsPipeline::new(self.profile, source, generator))
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
