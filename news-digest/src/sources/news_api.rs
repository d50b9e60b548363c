use crate::fetcher::Fetcher;
use crate::traits::ArticleSource;
use crate::types::{ArticleRecord, NewsError, QuerySpec, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org";

/// Title NewsAPI puts on articles that were taken down after indexing
const REMOVED_TITLE: &str = "[Removed]";

/// Article source backed by the NewsAPI `/v2/everything` search endpoint
pub struct NewsApiSource {
    fetcher: Fetcher,
    base_url: String,
    api_key: String,
}

impl NewsApiSource {
    pub fn new(fetcher: Fetcher, base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| NewsError::ConfigurationMissing("NEWS_API_KEY is not set".to_string()))?;

        Ok(Self {
            fetcher,
            base_url: base_url.into(),
            api_key,
        })
    }

    fn query_params(query: &QuerySpec) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", query.keyword_filter()),
            ("domains", query.domain_allow_list.join(",")),
            ("language", query.language.clone()),
            ("sortBy", query.sort_order.as_param().to_string()),
            ("pageSize", query.page_size.to_string()),
        ];
        if let Some(from) = query.from {
            params.push(("from", from.format("%Y-%m-%d").to_string()));
        }
        params
    }
}

#[async_trait]
impl ArticleSource for NewsApiSource {
    fn source_name(&self) -> String {
        format!("NewsAPI ({})", self.base_url)
    }

    async fn fetch(&self, query: &QuerySpec) -> Result<Vec<ArticleRecord>> {
        let url = Fetcher::endpoint(&self.base_url, "/v2/everything")?;
        let params = Self::query_params(query);

        debug!(
            "Querying NewsAPI: q={:?} domains={:?}",
            query.keyword_filter(),
            query.domain_allow_list
        );

        let response: EverythingResponse = self
            .fetcher
            .get_json(url, &params, &[("X-Api-Key", self.api_key.as_str())])
            .await
            .map_err(|e| NewsError::SourceUnavailable(e.to_string()))?;

        if response.status != "ok" {
            return Err(NewsError::SourceUnavailable(format!(
                "NewsAPI returned status '{}': {}",
                response.status,
                response.message.unwrap_or_else(|| "no message".to_string())
            )));
        }

        let articles: Vec<ArticleRecord> = response
            .articles
            .into_iter()
            .filter_map(NewsApiArticle::into_record)
            .take(query.page_size as usize)
            .collect();

        info!(
            "NewsAPI returned {} articles (total results: {})",
            articles.len(),
            response.total_results.unwrap_or(0)
        );
        Ok(articles)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    total_results: Option<u64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    #[serde(default)]
    source: Option<NewsApiSourceRef>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSourceRef {
    #[serde(default)]
    name: Option<String>,
}

impl NewsApiArticle {
    fn into_record(self) -> Option<ArticleRecord> {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "No title".to_string());

        if title == REMOVED_TITLE {
            return None;
        }

        let published_at = self
            .published_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Some(ArticleRecord {
            title,
            description: self.description.filter(|d| !d.trim().is_empty()),
            source_name: self.source.and_then(|s| s.name),
            url: self.url,
            published_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn missing_api_key_is_a_configuration_error() {
        let fetcher = Fetcher::new(Default::default()).unwrap();
        let result = NewsApiSource::new(fetcher, DEFAULT_BASE_URL, Some("  ".to_string()));
        assert!(matches!(result, Err(NewsError::ConfigurationMissing(_))));
    }

    #[test]
    fn query_params_follow_query_spec() {
        let query = QuerySpec::new(["LLM", "AI agents"], "en", 5)
            .with_from(NaiveDate::from_ymd_opt(2025, 6, 23))
            .with_domains(&["techcrunch.com".to_string(), "wired.com".to_string()]);

        let params = NewsApiSource::query_params(&query);
        assert_eq!(
            params,
            vec![
                ("q", "LLM OR AI agents".to_string()),
                ("domains", "techcrunch.com,wired.com".to_string()),
                ("language", "en".to_string()),
                ("sortBy", "publishedAt".to_string()),
                ("pageSize", "5".to_string()),
                ("from", "2025-06-23".to_string()),
            ]
        );
    }

    #[test]
    fn removed_articles_are_skipped_and_titles_defaulted() {
        let removed = NewsApiArticle {
            source: None,
            title: Some("[Removed]".to_string()),
            description: None,
            url: None,
            published_at: None,
        };
        assert!(removed.into_record().is_none());

        let untitled = NewsApiArticle {
            source: Some(NewsApiSourceRef {
                name: Some("Wired".to_string()),
            }),
            title: None,
            description: Some("   ".to_string()),
            url: Some("https://wired.com/x".to_string()),
            published_at: Some("2025-06-23T10:00:00Z".to_string()),
        };
        let record = untitled.into_record().unwrap();
        assert_eq!(record.title, "No title");
        assert_eq!(record.description, None);
        assert_eq!(record.source_name.as_deref(), Some("Wired"));
        assert!(record.published_at.is_some());
    }
}
