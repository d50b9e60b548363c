use crate::types::{Digest, TopicBlock};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

pub const MIN_BULLETS: usize = 2;
pub const MAX_BULLETS: usize = 3;

/// Markdown links: keep the label, drop the target
static MARKDOWN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("valid markdown link regex"));

/// Bare URLs, anything still carrying a scheme, `www.` or `http`, and
/// scheme-less `domain.tld/path` references
static URL_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\(?(?:[a-z][a-z0-9+.-]*://|www\.)\S*|\S*http\S*|\(?\b(?:[a-z0-9-]+\.)+[a-z]{2,}/\S*",
    )
    .expect("valid url regex")
});

static NUMBERED_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(?\d{1,2}[.)]\s+").expect("valid numbering regex"));

static LABEL_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:title|topic|headline)\s*\d*\s*:\s*").expect("valid label regex")
});

static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").expect("valid spaces regex"));

/// Characters that carry markup meaning in chat clients and markdown renderers
pub const MARKUP_CHARS: [char; 8] = ['*', '#', '`', '~', '|', '_', '[', ']'];

const BULLET_MARKERS: [char; 4] = ['-', '*', '•', '+'];

/// Strip URLs and markup from one line of model output.
pub fn clean_line(line: &str) -> String {
    // links need their brackets; URLs are matched after markup is gone so
    // that `ht*tp` cannot reassemble into `http`
    let without_links = MARKDOWN_LINK.replace_all(line, "$1");
    let without_markup: String = without_links
        .chars()
        .filter(|c| !MARKUP_CHARS.contains(c) && !c.is_control())
        .collect();
    let without_urls = URL_TOKEN.replace_all(&without_markup, "");
    let collapsed = SPACES.replace_all(&without_urls, " ");
    collapsed
        .trim()
        .trim_start_matches('>')
        .trim()
        .trim_end_matches(|c: char| c == ':' || c == '(' || c == ',')
        .trim()
        .to_string()
}

/// Clean free text (several lines) into a single plain paragraph.
pub fn clean_text(text: &str) -> String {
    text.lines()
        .map(clean_line)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, PartialEq)]
enum Line {
    Title(String),
    Bullet(String),
}

fn classify(raw: &str) -> Option<Line> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut chars = trimmed.chars();
    let first = chars.next()?;
    let rest = chars.as_str();
    // "**Bold title**" starts with a marker char but is not a bullet
    let is_bullet = BULLET_MARKERS.contains(&first)
        && rest.starts_with(|c: char| c.is_whitespace());

    if is_bullet {
        let text = clean_line(rest);
        return (!text.is_empty()).then_some(Line::Bullet(text));
    }

    let text = clean_line(trimmed);
    let text = NUMBERED_PREFIX.replace(&text, "");
    let text = LABEL_PREFIX.replace(&text, "").trim().to_string();
    (!text.is_empty()).then_some(Line::Title(text))
}

/// Parse model output into the digest template.
///
/// Blocks with fewer than `MIN_BULLETS` bullets are dropped, extra bullets
/// past `MAX_BULLETS` are cut, and at most `max_topics` blocks are kept.
pub fn parse_topic_blocks(text: &str, max_topics: usize) -> Vec<TopicBlock> {
    let mut blocks: Vec<TopicBlock> = Vec::new();
    let mut current: Option<TopicBlock> = None;

    for line in text.lines().filter_map(classify) {
        match line {
            Line::Title(title) => {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
                current = Some(TopicBlock {
                    title,
                    bullets: Vec::new(),
                });
            }
            Line::Bullet(bullet) => match current.as_mut() {
                Some(block) => block.bullets.push(bullet),
                None => debug!("Dropping bullet without a title: {}", bullet),
            },
        }
    }
    if let Some(block) = current.take() {
        blocks.push(block);
    }

    blocks
        .into_iter()
        .filter(|block| {
            let keep = block.bullets.len() >= MIN_BULLETS;
            if !keep {
                debug!(
                    "Dropping topic '{}' with {} bullet(s)",
                    block.title,
                    block.bullets.len()
                );
            }
            keep
        })
        .map(|mut block| {
            block.bullets.truncate(MAX_BULLETS);
            block
        })
        .take(max_topics)
        .collect()
}

/// Check the rendered-text invariants of a digest.
pub fn is_well_formed(digest: &Digest, max_topics: usize) -> bool {
    let text = digest.to_string();
    if text.trim().is_empty() || text.contains("http") || text.contains('*') {
        return false;
    }

    match digest {
        Digest::NoNews { .. } => true,
        Digest::Topics(blocks) => {
            !blocks.is_empty()
                && blocks.len() <= max_topics
                && blocks.iter().all(|block| {
                    !block.title.is_empty()
                        && (MIN_BULLETS..=MAX_BULLETS).contains(&block.bullets.len())
                        && std::iter::once(&block.title)
                            .chain(block.bullets.iter())
                            .all(|line| !line.contains(MARKUP_CHARS) && !line.contains('\n'))
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_line_strips_urls_and_markup() {
        assert_eq!(
            clean_line("**OpenAI** ships [agents](https://openai.com/agents) see https://x.io/a #ai"),
            "OpenAI ships agents see ai"
        );
        assert_eq!(clean_line("Read more at www.example.com."), "Read more at");
        assert_eq!(clean_line("HTTP/3 adoption grows"), "adoption grows");
    }

    #[test]
    fn clean_line_catches_split_and_scheme_less_urls() {
        assert_eq!(clean_line("see ht*tp and ht_tps"), "see and");
        assert_eq!(
            clean_line("Full story at techcrunch.com/2025/06/agents today"),
            "Full story at today"
        );
        assert_eq!(clean_line("Version 2.0/3.0 ships"), "Version 2.0/3.0 ships");

        let blocks = parse_topic_blocks("Title\n- read ht**tp docs\n- two\n", 3);
        let digest = Digest::Topics(blocks);
        assert_eq!(digest.to_string(), "Title\n- read docs\n- two");
        assert!(is_well_formed(&digest, 3));
    }

    #[test]
    fn parses_markdown_heavy_output_into_template() {
        let raw = "\
## 1. **New open model released**
* It beats prior models on reasoning.
* Weights are available for research.

Title: Agents in production
- Companies deploy autonomous agents.
- Reliability remains a concern.
- Tooling is maturing quickly.
- This fourth bullet is dropped.

Lonely heading
- Only one bullet here.
";
        let blocks = parse_topic_blocks(raw, 3);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].title, "New open model released");
        assert_eq!(
            blocks[0].bullets,
            vec![
                "It beats prior models on reasoning.".to_string(),
                "Weights are available for research.".to_string()
            ]
        );
        assert_eq!(blocks[1].title, "Agents in production");
        assert_eq!(blocks[1].bullets.len(), 3);
    }

    #[test]
    fn keeps_at_most_max_topics() {
        let raw = (1..=5)
            .map(|i| format!("Topic {i}\n- first point\n- second point\n"))
            .collect::<Vec<_>>()
            .join("\n");
        let blocks = parse_topic_blocks(&raw, 3);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[2].title, "Topic 3");
    }

    #[test]
    fn orphan_bullets_are_dropped() {
        let blocks = parse_topic_blocks("- floating\n- bullets\n", 3);
        assert!(blocks.is_empty());
    }

    #[test]
    fn well_formedness_check() {
        let good = Digest::Topics(vec![TopicBlock {
            title: "Title".to_string(),
            bullets: vec!["one".to_string(), "two".to_string()],
        }]);
        assert!(is_well_formed(&good, 3));

        let bad = Digest::Topics(vec![TopicBlock {
            title: "Title".to_string(),
            bullets: vec!["see http://x".to_string(), "two".to_string()],
        }]);
        assert!(!is_well_formed(&bad, 3));

        let empty = Digest::NoNews {
            message: String::new(),
        };
        assert!(!is_well_formed(&empty, 3));
    }
}
