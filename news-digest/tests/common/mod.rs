#![allow(dead_code)]

// Test doubles for the pipeline's external collaborators
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use news_digest::types::*;
use news_digest::{ArticleSource, GenerationRequest, TextGenerator};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn article(i: usize) -> ArticleRecord {
    ArticleRecord {
        title: format!("Lab {} ships a new agent framework", i),
        description: Some(format!(
            "Details at https://news.example.com/{} about the **release**.",
            i
        )),
        source_name: Some(format!("Example Wire {}", i)),
        url: Some(format!("https://news.example.com/{}", i)),
        published_at: Utc.with_ymd_and_hms(2025, 6, 23, 8, i as u32 % 60, 0).single(),
    }
}

pub fn articles(n: usize) -> Vec<ArticleRecord> {
    (1..=n).map(article).collect()
}

/// Article source answering from a scripted queue and remembering every query
pub struct StubSource {
    responses: Mutex<VecDeque<Result<Vec<ArticleRecord>>>>,
    calls: Mutex<Vec<QuerySpec>>,
}

impl StubSource {
    pub fn new(responses: Vec<Result<Vec<ArticleRecord>>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<QuerySpec> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArticleSource for StubSource {
    fn source_name(&self) -> String {
        "stub source".to_string()
    }

    async fn fetch(&self, query: &QuerySpec) -> Result<Vec<ArticleRecord>> {
        self.calls.lock().unwrap().push(query.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Deterministic generator that answers like a chatty model would:
/// markdown, links and all.
pub struct ScriptedGenerator {
    calls: Mutex<Vec<GenerationRequest>>,
    fail_role: Option<String>,
    research_override: Option<String>,
    refiner_override: Option<String>,
}

impl ScriptedGenerator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_role: None,
            research_override: None,
            refiner_override: None,
        })
    }

    /// Fail every call framed with `role`
    pub fn failing_on(role: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_role: Some(role.to_string()),
            research_override: None,
            refiner_override: None,
        })
    }

    /// Answer refinement calls with a fixed text
    pub fn refining_with(text: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_role: None,
            research_override: None,
            refiner_override: Some(text.to_string()),
        })
    }

    /// Answer research calls with a fixed text
    pub fn researching_with(text: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_role: None,
            research_override: Some(text.to_string()),
            refiner_override: None,
        })
    }

    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, role: &str) -> usize {
        self.calls().iter().filter(|r| r.role == role).count()
    }

    fn research(input: &str) -> String {
        let title = input
            .lines()
            .find_map(|line| line.strip_prefix("Title: "))
            .unwrap_or("something");
        format!(
            "**{}** signals faster progress in AI tooling.\nRead more: https://example.com/story",
            title
        )
    }

    fn refine(input: &str) -> String {
        let mut out = String::from("Here is your summary:\n\n");
        for block in input.split("\n\n") {
            let mut lines = block.lines();
            let topic = lines
                .next()
                .and_then(|l| l.split_once(": ").map(|(_, t)| t))
                .unwrap_or("Topic");
            let summary = lines
                .next()
                .and_then(|l| l.strip_prefix("Summary: "))
                .unwrap_or("");
            out.push_str(&format!(
                "## {}\n* {}\n* Source: [the article](https://example.com/a)\n\n",
                topic, summary
            ));
        }
        out
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn generator_name(&self) -> String {
        "scripted".to_string()
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request.clone());

        if self.fail_role.as_deref() == Some(request.role.as_str()) {
            return Err(NewsError::GenerationFailure("model offline".to_string()));
        }

        match request.role.as_str() {
            "AI News Researcher" => Ok(self
                .research_override
                .clone()
                .unwrap_or_else(|| Self::research(&request.input))),
            _ => Ok(self
                .refiner_override
                .clone()
                .unwrap_or_else(|| Self::refine(&request.input))),
        }
    }
}
