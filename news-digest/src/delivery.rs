use crate::types::{DeliveryTarget, NewsError, Result};
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

/// A persisted group record as written by the chat bot: `{"groupId": "..."}`
#[derive(Debug, Deserialize)]
struct GroupRecord {
    #[serde(rename = "groupId", default)]
    group_id: Option<String>,
}

/// The record file holds either a single object or a list of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GroupRecordFile {
    One(GroupRecord),
    Many(Vec<GroupRecord>),
}

/// Resolve the delivery channel from its JSON record.
///
/// A missing file, invalid JSON or a blank `groupId` is `ConfigurationMissing`.
pub fn load_delivery_target(path: &Path) -> Result<DeliveryTarget> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        NewsError::ConfigurationMissing(format!(
            "cannot read group record {}: {}",
            path.display(),
            e
        ))
    })?;
    parse_delivery_target(&raw).map_err(|reason| {
        NewsError::ConfigurationMissing(format!("group record {}: {}", path.display(), reason))
    })
}

fn parse_delivery_target(raw: &str) -> std::result::Result<DeliveryTarget, String> {
    let file: GroupRecordFile =
        serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {}", e))?;

    let first = match file {
        GroupRecordFile::One(record) => record.group_id,
        GroupRecordFile::Many(records) => records.into_iter().find_map(|r| r.group_id),
    };

    first
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .map(|group_id| DeliveryTarget { group_id })
        .ok_or_else(|| "no groupId found".to_string())
}

/// External program that posts a digest to a chat group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl DeliveryConfig {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

/// Hand the digest to the delivery program on stdin, with the group id as its last argument.
pub async fn deliver(config: &DeliveryConfig, target: &DeliveryTarget, text: &str) -> Result<()> {
    info!(
        "Delivering digest ({} chars) via {} to group {}",
        text.len(),
        config.program,
        target.group_id
    );

    let mut child = Command::new(&config.program)
        .args(&config.args)
        .arg(&target.group_id)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|e| NewsError::Delivery(format!("cannot start {}: {}", config.program, e)))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| NewsError::Delivery("delivery process has no stdin".to_string()))?;
    let write_result = async {
        stdin.write_all(text.as_bytes()).await?;
        stdin.flush().await?;
        drop(stdin);
        Ok::<(), std::io::Error>(())
    }
    .await;

    let status = child
        .wait()
        .await
        .map_err(|e| NewsError::Delivery(format!("waiting for {}: {}", config.program, e)))?;

    write_result
        .map_err(|e| NewsError::Delivery(format!("writing digest to {}: {}", config.program, e)))?;

    if !status.success() {
        return Err(NewsError::Delivery(format!(
            "{} exited with {}",
            config.program, status
        )));
    }

    debug!("Delivery process finished with {}", status);
    Ok(())
}
