//! Prompt library for advice requests
//!
//! Prompts are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/watersave/prompts/overrides/)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Each prompt file starts with YAML frontmatter followed by `# System` and
//! `# User` sections. The user section is rendered with `{{var}}`
//! substitution and `{{#if var}}...{{/if}}` conditional blocks.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default prompts (compiled into binary)
mod defaults {
    pub const ASK_ASSISTANT: &str = include_str!("../../../prompts/ask_assistant.md");
    pub const ANALYZE_PATTERN: &str = include_str!("../../../prompts/analyze_pattern.md");
    pub const GENERATE_CHALLENGE: &str = include_str!("../../../prompts/generate_challenge.md");
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Free-form question from the user
    AskAssistant,
    /// Pattern analysis over recorded usage and behaviors
    AnalyzePattern,
    /// Personalized saving challenge
    GenerateChallenge,
}

impl PromptId {
    /// Get the string identifier for this prompt
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AskAssistant => "ask_assistant",
            Self::AnalyzePattern => "analyze_pattern",
            Self::GenerateChallenge => "generate_challenge",
        }
    }

    /// Get all known prompt IDs
    pub fn all() -> &'static [PromptId] {
        &[
            Self::AskAssistant,
            Self::AnalyzePattern,
            Self::GenerateChallenge,
        ]
    }

    /// Maximum output tokens requested for this prompt
    pub fn max_tokens(&self) -> u32 {
        match self {
            Self::AskAssistant | Self::AnalyzePattern => 500,
            Self::GenerateChallenge => 300,
        }
    }

    /// Get the default embedded content for this prompt
    fn default_content(&self) -> &'static str {
        match self {
            Self::AskAssistant => defaults::ASK_ASSISTANT,
            Self::AnalyzePattern => defaults::ANALYZE_PATTERN,
            Self::GenerateChallenge => defaults::GENERATE_CHALLENGE,
        }
    }
}

impl std::str::FromStr for PromptId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PromptId::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| Error::Prompt(format!("Unknown prompt: {}", s)))
    }
}

/// Prompt frontmatter metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PromptMetadata {
    /// Unique identifier
    pub id: String,
    /// Version number for tracking changes
    pub version: u32,
    /// One-line description shown by `watersave prompts`
    #[serde(default)]
    pub description: String,
}

/// A loaded prompt with metadata and content
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Metadata from frontmatter
    pub metadata: PromptMetadata,
    /// The prompt content (system + user sections)
    pub content: String,
    /// Whether this came from an override file
    pub is_override: bool,
    /// Path to override file (if any)
    pub override_path: Option<PathBuf>,
}

impl Prompt {
    /// Get the system section of the prompt
    pub fn system_section(&self) -> Option<&str> {
        extract_section(&self.content, "# System")
    }

    /// Get the user section of the prompt
    pub fn user_section(&self) -> Option<&str> {
        extract_section(&self.content, "# User")
    }

    /// Render the user section (or the whole body if it has none)
    pub fn render_user(&self, vars: &HashMap<&str, String>) -> String {
        let template = self.user_section().unwrap_or(&self.content);
        render_template(template, vars)
    }
}

/// Prompt library for loading and caching prompts
pub struct PromptLibrary {
    /// Override directory path
    override_dir: Option<PathBuf>,
    /// Cached parsed prompts
    cache: HashMap<PromptId, Prompt>,
}

impl PromptLibrary {
    /// Create a new prompt library with default paths
    pub fn new() -> Self {
        Self {
            override_dir: default_prompts_dir(),
            cache: HashMap::new(),
        }
    }

    /// Create a prompt library with a custom override directory
    pub fn with_override_dir(path: PathBuf) -> Self {
        Self {
            override_dir: Some(path),
            cache: HashMap::new(),
        }
    }

    /// Create a prompt library with no override directory (embedded only)
    pub fn embedded_only() -> Self {
        Self {
            override_dir: None,
            cache: HashMap::new(),
        }
    }

    /// Get a prompt by ID, loading from override or default
    pub fn get(&mut self, id: PromptId) -> Result<&Prompt> {
        if !self.cache.contains_key(&id) {
            let prompt = self.load(id)?;
            self.cache.insert(id, prompt);
        }
        self.cache
            .get(&id)
            .ok_or_else(|| Error::Prompt(format!("Prompt not cached: {}", id.as_str())))
    }

    /// Load a prompt (checking override first, then default)
    fn load(&self, id: PromptId) -> Result<Prompt> {
        if let Some(ref override_dir) = self.override_dir {
            let override_path = override_dir.join(format!("{}.md", id.as_str()));
            if override_path.exists() {
                let content = fs::read_to_string(&override_path).map_err(|e| {
                    Error::Prompt(format!(
                        "Failed to read prompt override {}: {}",
                        override_path.display(),
                        e
                    ))
                })?;
                let (metadata, body) = parse_prompt(&content)?;
                tracing::debug!(prompt = id.as_str(), path = %override_path.display(), "Using prompt override");
                return Ok(Prompt {
                    metadata,
                    content: body,
                    is_override: true,
                    override_path: Some(override_path),
                });
            }
        }

        let (metadata, body) = parse_prompt(id.default_content())?;
        Ok(Prompt {
            metadata,
            content: body,
            is_override: false,
            override_path: None,
        })
    }

    /// List all prompts with their override status
    pub fn list(&mut self) -> Vec<PromptInfo> {
        PromptId::all()
            .iter()
            .map(|&id| {
                let has_override = self.has_override(id);
                let override_path = if has_override {
                    self.override_dir
                        .as_ref()
                        .map(|d| d.join(format!("{}.md", id.as_str())))
                } else {
                    None
                };
                let prompt = self.get(id).ok();
                PromptInfo {
                    id: id.as_str().to_string(),
                    version: prompt.map(|p| p.metadata.version).unwrap_or(0),
                    description: prompt
                        .map(|p| p.metadata.description.clone())
                        .unwrap_or_default(),
                    max_tokens: id.max_tokens(),
                    has_override,
                    override_path,
                }
            })
            .collect()
    }

    /// Check if a prompt has an override file
    pub fn has_override(&self, id: PromptId) -> bool {
        self.override_dir
            .as_ref()
            .is_some_and(|dir| dir.join(format!("{}.md", id.as_str())).exists())
    }

    /// Get the override directory path
    pub fn override_dir(&self) -> Option<&PathBuf> {
        self.override_dir.as_ref()
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Information about a prompt for listing
#[derive(Debug, Clone)]
pub struct PromptInfo {
    pub id: String,
    pub version: u32,
    pub description: String,
    pub max_tokens: u32,
    pub has_override: bool,
    pub override_path: Option<PathBuf>,
}

/// Default prompts override directory
pub fn default_prompts_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("watersave").join("prompts").join("overrides"))
}

/// Parse a prompt file into metadata and body
fn parse_prompt(content: &str) -> Result<(PromptMetadata, String)> {
    let content = content.trim();

    if !content.starts_with("---") {
        return Err(Error::Prompt(
            "Prompt must start with YAML frontmatter (---)".into(),
        ));
    }

    let rest = &content[3..];
    let end = rest.find("---").ok_or_else(|| {
        Error::Prompt("Prompt frontmatter not closed (missing second ---)".into())
    })?;

    let frontmatter = rest[..end].trim();
    let body = rest[end + 3..].trim();

    let metadata: PromptMetadata = serde_yaml::from_str(frontmatter)
        .map_err(|e| Error::Prompt(format!("Invalid prompt frontmatter: {}", e)))?;

    Ok((metadata, body.to_string()))
}

/// Extract a section from the prompt content
fn extract_section<'a>(content: &'a str, header: &str) -> Option<&'a str> {
    let start = content.find(header)?;
    let after_header = &content[start + header.len()..];

    // Section runs until the next top-level header
    let end = after_header.find("\n# ").unwrap_or(after_header.len());

    Some(after_header[..end].trim())
}

/// Resolve conditional blocks, then replace `{{var}}` placeholders
///
/// Placeholders are substituted in one left-to-right pass, so braces inside a
/// substituted value are copied as-is. Unknown placeholders are left intact.
fn render_template(template: &str, vars: &HashMap<&str, String>) -> String {
    let template = remove_unmatched_conditionals(template, vars);
    let mut result = String::with_capacity(template.len());
    let mut rest = template.as_str();

    while let Some(open) = rest.find("{{") {
        result.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            rest = &rest[open..];
            break;
        };

        let name = &after[..close];
        match vars.get(name) {
            Some(value) => result.push_str(value),
            None => result.push_str(&rest[open..open + close + 4]),
        }
        rest = &after[close + 2..];
    }

    result.push_str(rest);
    result
}

/// Keep `{{#if var}}` blocks whose variable is set and non-empty, drop the rest
fn remove_unmatched_conditionals(content: &str, vars: &HashMap<&str, String>) -> String {
    let mut result = content.to_string();

    while let Some(if_start) = result.find("{{#if ") {
        let var_start = if_start + 6;
        let Some(var_end) = result[var_start..].find("}}") else {
            break;
        };
        let var_name = &result[var_start..var_start + var_end];
        let block_start = var_start + var_end + 2;

        let Some(endif_pos) = result[block_start..].find("{{/if}}") else {
            break;
        };
        let block_content = &result[block_start..block_start + endif_pos];
        let full_end = block_start + endif_pos + 7;

        let keep = vars.get(var_name).is_some_and(|v| !v.is_empty());
        result = if keep {
            format!(
                "{}{}{}",
                &result[..if_start],
                block_content,
                &result[full_end..]
            )
        } else {
            format!("{}{}", &result[..if_start], &result[full_end..])
        };
    }

    result
}
