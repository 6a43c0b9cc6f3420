use regex::Regex;
use serde::{Deserialize, Serialize};

/// AI assistant platform a skill is written for
///
/// The set is closed: the conversion service only understands these three
/// values, serialized lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Claude,
    Chatgpt,
    Gemini,
}

/// Error returned when parsing an unknown platform label
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid platform: {input}. Valid platforms: claude, chatgpt, gemini")]
pub struct ParsePlatformError {
    pub input: String,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Claude, Platform::Chatgpt, Platform::Gemini];

    /// Wire value used in request bodies and form fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Claude => "claude",
            Platform::Chatgpt => "chatgpt",
            Platform::Gemini => "gemini",
        }
    }

    /// Human-facing name of the platform's skill format
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Claude => "Claude Skills",
            Platform::Chatgpt => "ChatGPT Custom GPTs",
            Platform::Gemini => "Gemini Gems",
        }
    }

    /// File extension used when saving converted content
    pub fn output_extension(&self) -> &'static str {
        match self {
            Platform::Claude => "md",
            _ => "txt",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "claude" => Ok(Platform::Claude),
            "chatgpt" => Ok(Platform::Chatgpt),
            "gemini" => Ok(Platform::Gemini),
            _ => Err(ParsePlatformError {
                input: s.to_string(),
            }),
        }
    }
}

/// Guess which platform a piece of skill content was written for
///
/// Heuristics only, used to hint at a mismatched `--from` flag. A YAML
/// frontmatter block carrying a `name:` key reads as a Claude SKILL.md;
/// a leading "You are ..." role preamble reads as a ChatGPT custom GPT.
/// Anything else is unrecognized.
pub fn detect_platform(content: &str) -> Option<Platform> {
    let content = content.trim_start();

    let frontmatter = Regex::new(r"(?s)\A---\s*\n(.*?)\n---").unwrap();
    if let Some(caps) = frontmatter.captures(content) {
        if Regex::new(r"(?m)^name:").unwrap().is_match(&caps[1]) {
            return Some(Platform::Claude);
        }
    }

    let role_preamble = Regex::new(r"(?i)\A(#[^\n]*\n+)?You are ").unwrap();
    if role_preamble.is_match(content) {
        return Some(Platform::Chatgpt);
    }

    None
}
