use serde::{Deserialize, Serialize};

/// Maximum characters of a single payload field sent to the model
pub const MAX_FIELD_LEN: usize = 1_200;

/// Role/goal/instruction framing plus the payload for one generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub description: String,
    pub expected_output: String,
    pub input: String,
}

impl GenerationRequest {
    /// System message: who the model is and what it is after
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour goal: {}",
            self.role, self.backstory, self.goal
        )
    }

    /// User message: the task, the expected shape of the answer, then the payload
    pub fn user_prompt(&self) -> String {
        format!(
            "{}\n\nExpected output: {}\n\nInput:\n{}",
            self.description, self.expected_output, self.input
        )
    }
}

/// Framing for the research stage: one call per selected article
pub fn research_request(payload: String) -> GenerationRequest {
    GenerationRequest {
        role: "AI News Researcher".to_string(),
        goal: "Summarize real-time AI news on LLMs, RAG, or AI agents.".to_string(),
        backstory: "You're a highly skilled AI news analyst who separates real developments from noise."
            .to_string(),
        description: "Read the news article below and explain what happened and why it matters. \
            Write one or two plain sentences. Do not include any URLs, source attributions or markdown."
            .to_string(),
        expected_output: "A one or two sentence plain-text synopsis of the article, with no URLs."
            .to_string(),
        input: payload,
    }
}

/// Framing for the refinement stage, with the strict output grammar
pub fn refinement_request(payload: String, max_topics: usize) -> GenerationRequest {
    GenerationRequest {
        role: "AI Summary Refiner".to_string(),
        goal: "Polish and format AI news into a clear, structured summary without asterisks or URLs."
            .to_string(),
        backstory: "You're an expert communicator. Your job is to take raw summaries and refine them \
            into clean, professional news briefs. Use hyphens for bullets, plain topic titles, and remove URLs."
            .to_string(),
        description: format!(
            "Take the summarized news topics below and format them into a plain-text summary suitable \
             for users. Cover at most {} topics. Use this structure for every topic:\n\n\
             Title\n\
             - Bullet point 1\n\
             - Bullet point 2\n\
             (Optionally a 3rd point)\n\n\
             Separate topics with a blank line. Do not include any URLs or markdown symbols like \
             asterisks or hashes. Ensure clarity, readability, and proper grammar.",
            max_topics
        ),
        expected_output:
            "Clean, user-ready plain-text summary of top AI news topics with no URLs or symbols."
                .to_string(),
        input: payload,
    }
}

/// Remove control characters and hard-truncate a payload field
pub fn sanitize_field(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .take(MAX_FIELD_LEN)
        .collect::<String>()
        .trim()
        .to_string()
}
