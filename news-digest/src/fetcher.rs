use crate::types::{FetchConfig, NewsError, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

/// Shared HTTP plumbing for the article source and the text generator.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client })
    }

    /// Join `path` onto `base_url`, keeping any path prefix the base already has.
    pub fn endpoint(base_url: &str, path: &str) -> Result<Url> {
        let mut base = base_url.trim_end_matches('/').to_string();
        base.push('/');
        let url = Url::parse(&base)?.join(path.trim_start_matches('/'))?;
        Ok(url)
    }

    pub async fn get_json<T, Q>(
        &self,
        url: Url,
        query: &Q,
        headers: &[(&str, &str)],
    ) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let mut request = self.client.get(url.clone()).query(query);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        self.send_json(url, request).await
    }

    pub async fn post_json<T, B>(&self, url: Url, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.client.post(url.clone()).json(body);
        self.send_json(url, request).await
    }

    async fn send_json<T: DeserializeOwned>(&self, url: Url, request: RequestBuilder) -> Result<T> {
        let start_time = Instant::now();
        debug!("Requesting {}", redact(&url));

        let response = request.send().await?;
        let status = response.status();
        let body = read_body(response).await?;

        debug!(
            "Response from {}: HTTP {} ({} bytes) in {}ms",
            redact(&url),
            status.as_u16(),
            body.len(),
            start_time.elapsed().as_millis()
        );

        if !status.is_success() {
            warn!("HTTP {} from {}", status, redact(&url));
            return Err(NewsError::General(format!(
                "HTTP {}: {}",
                status.as_u16(),
                error_excerpt(&body)
            )));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

async fn read_body(response: Response) -> Result<String> {
    Ok(response.text().await?)
}

/// URL for logging, without query parameters
fn redact(url: &Url) -> String {
    let mut shown = url.clone();
    shown.set_query(None);
    shown.to_string()
}

fn error_excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let url = Fetcher::endpoint("http://localhost:8080/proxy/", "/v2/everything").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/v2/everything");

        let url = Fetcher::endpoint("https://newsapi.org", "v2/everything").unwrap();
        assert_eq!(url.as_str(), "https://newsapi.org/v2/everything");
    }

    #[test]
    fn redact_strips_query() {
        let url = Url::parse("https://newsapi.org/v2/everything?q=AI&apiKey=secret").unwrap();
        assert_eq!(redact(&url), "https://newsapi.org/v2/everything");
    }
}
