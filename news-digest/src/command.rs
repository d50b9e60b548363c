use crate::pipeline::NewsPipeline;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{error, info, warn};

pub const GET_AI_NEWS: &str = "get ai news";
pub const UNKNOWN_COMMAND: &str = "Unknown command";

/// Commands accepted by the request/response adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    GetAiNews,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(GET_AI_NEWS) {
            Ok(Command::GetAiNews)
        } else {
            Err(UNKNOWN_COMMAND.to_string())
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandRequest {
    pub command: String,
}

/// `{"success": true, "summary": ...}` or `{"success": false, "error": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandResponse {
    pub fn summary(summary: String) -> Self {
        Self {
            success: true,
            summary: Some(summary),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            summary: None,
            error: Some(error.into()),
        }
    }
}

/// Run one inbound command. Failures come back as `success: false`, never as errors.
pub async fn handle_command(pipeline: &NewsPipeline, input: &str) -> CommandResponse {
    let command = match input.parse::<Command>() {
        Ok(command) => command,
        Err(message) => {
            warn!("Ignoring unknown command: {:?}", input);
            return CommandResponse::error(message);
        }
    };

    match command {
        Command::GetAiNews => {
            info!("Running AI news pipeline for command");
            match pipeline.run().await {
                Ok(digest) => CommandResponse::summary(digest.to_string()),
                Err(e) => {
                    error!("Pipeline failed: {}", e);
                    CommandResponse::error(e.to_string())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_matching_ignores_case_and_outer_whitespace() {
        assert_eq!("get ai news".parse::<Command>(), Ok(Command::GetAiNews));
        assert_eq!("Get AI News".parse::<Command>(), Ok(Command::GetAiNews));
        assert_eq!("  GET AI NEWS\n".parse::<Command>(), Ok(Command::GetAiNews));
        assert_eq!(
            "weather today".parse::<Command>(),
            Err(UNKNOWN_COMMAND.to_string())
        );
        assert!("get ai  news".parse::<Command>().is_err());
    }

    #[test]
    fn responses_serialize_without_empty_fields() {
        let ok = serde_json::to_value(CommandResponse::summary("digest".to_string())).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "summary": "digest"}));

        let err = serde_json::to_value(CommandResponse::error(UNKNOWN_COMMAND)).unwrap();
        assert_eq!(err, serde_json::json!({"success": false, "error": "Unknown command"}));
    }
}
