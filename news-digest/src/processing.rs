use crate::digest::{clean_line, clean_text, parse_topic_blocks};
use crate::prompt::{refinement_request, research_request, sanitize_field};
use crate::traits::TextGenerator;
use crate::types::{ArticleRecord, Digest, NewsError, Result, StageArtifact, TopicSynopsis};
use std::sync::Arc;
use tracing::{debug, info};

/// Upper bound (and default) for topics in one digest
pub const DEFAULT_MAX_TOPICS: usize = 3;

/// Keep a requested topic count within `1..=DEFAULT_MAX_TOPICS`.
pub fn clamp_topics(max_topics: usize) -> usize {
    max_topics.clamp(1, DEFAULT_MAX_TOPICS)
}

/// First stage: picks the leading articles and turns each into a topic + synopsis pair
pub struct ResearchStage {
    generator: Arc<dyn TextGenerator>,
    max_topics: usize,
}

impl ResearchStage {
    pub fn new(generator: Arc<dyn TextGenerator>, max_topics: usize) -> Self {
        Self {
            generator,
            max_topics: clamp_topics(max_topics),
        }
    }

    pub fn stage_name(&self) -> String {
        "research".to_string()
    }

    /// Summarize at most `max_topics` articles, in source order.
    ///
    /// An empty input yields `StageArtifact::NoTopicsFound`.
    pub async fn summarize_topics<I>(&self, articles: I) -> Result<StageArtifact>
    where
        I: IntoIterator<Item = ArticleRecord>,
    {
        let selected: Vec<ArticleRecord> = articles.into_iter().take(self.max_topics).collect();
        if selected.is_empty() {
            info!("Research stage received no articles");
            return Ok(StageArtifact::NoTopicsFound);
        }

        debug!("Processing {} articles in research stage", selected.len());

        let mut topics = Vec::with_capacity(selected.len());
        for article in &selected {
            debug!(
                "Researching '{}' (source: {}, url: {})",
                article.title,
                article.source_name.as_deref().unwrap_or("unknown"),
                article.url.as_deref().unwrap_or("none")
            );

            let raw = self
                .generator
                .generate(&research_request(article_payload(article)))
                .await?;
            let synopsis = clean_text(&raw);
            if synopsis.is_empty() {
                return Err(NewsError::GenerationFailure(format!(
                    "empty synopsis for '{}'",
                    article.title
                )));
            }

            let topic = match clean_line(&article.title) {
                title if title.is_empty() => "Untitled development".to_string(),
                title => title,
            };
            topics.push(TopicSynopsis { topic, synopsis });
        }

        info!("Research stage produced {} topics", topics.len());
        Ok(StageArtifact::Topics(topics))
    }
}

/// Payload sent to the model for one article. URL and source name stay out of it,
/// and links embedded in the text are stripped.
fn article_payload(article: &ArticleRecord) -> String {
    let published = article
        .published_at
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let description = article
        .description
        .as_deref()
        .map(|d| clean_text(&sanitize_field(d)))
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| "No description provided.".to_string());

    format!(
        "Title: {}\nPublished: {}\nDescription: {}",
        clean_line(&sanitize_field(&article.title)),
        published,
        description
    )
}

/// Second stage: rewrites the research topics into the fixed digest template
pub struct RefinementStage {
    generator: Arc<dyn TextGenerator>,
    max_topics: usize,
    no_news_message: String,
}

impl RefinementStage {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        max_topics: usize,
        no_news_message: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            max_topics: clamp_topics(max_topics),
            no_news_message: no_news_message.into(),
        }
    }

    pub fn stage_name(&self) -> String {
        "refinement".to_string()
    }

    pub async fn refine(&self, artifact: StageArtifact) -> Result<Digest> {
        let topics = match artifact {
            StageArtifact::NoTopicsFound => {
                info!("No topics to refine, emitting no-news digest");
                return Ok(Digest::NoNews {
                    message: self.no_news_message.clone(),
                });
            }
            StageArtifact::Topics(topics) => topics,
        };

        let limit = self.max_topics.min(topics.len());
        let request = refinement_request(topics_payload(&topics), limit);
        let raw = self.generator.generate(&request).await?;

        let blocks = parse_topic_blocks(&raw, limit);
        if blocks.is_empty() {
            return Err(NewsError::GenerationFailure(
                "refined summary did not follow the digest template".to_string(),
            ));
        }

        info!(
            "Refinement stage produced {} topic blocks from {} topics",
            blocks.len(),
            topics.len()
        );
        Ok(Digest::Topics(blocks))
    }
}

fn topics_payload(topics: &[TopicSynopsis]) -> String {
    topics
        .iter()
        .enumerate()
        .map(|(i, t)| format!("Topic {}: {}\nSummary: {}", i + 1, t.topic, t.synopsis))
        .collect::<Vec<_>>()
        .join("\n\n")
}
