//! Configuration for the prompt builder

use crate::error::{Result, WizardError};
use crate::types::COMMON_TAGS;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings shared by the wizard, its stores, and the prompt composer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderConfig {
    /// Local storage key of the in-progress draft
    #[serde(default = "default_draft_key")]
    pub draft_key: String,

    /// Local storage key of the analysis history
    #[serde(default = "default_history_key")]
    pub history_key: String,

    /// Most recent analyses kept locally
    #[serde(default = "default_max_history_items")]
    pub max_history_items: usize,

    /// Visibility of newly created prompts
    #[serde(default = "default_public")]
    pub default_public: bool,

    /// Characters of the goal used as the prompt title
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,

    /// Tag vocabulary offered for autocomplete
    #[serde(default = "default_suggested_tags")]
    pub suggested_tags: Vec<String>,

    /// Cap on role autocomplete entries
    #[serde(default = "default_max_role_suggestions")]
    pub max_role_suggestions: usize,

    /// Give up on the submission sink after this many seconds; `None` waits forever
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_timeout_secs: Option<u64>,
}

fn default_draft_key() -> String {
    "promptify-prompt-draft".to_string()
}

fn default_history_key() -> String {
    "promptify-analysis-history".to_string()
}

fn default_max_history_items() -> usize {
    50
}

fn default_public() -> bool {
    true
}

fn default_title_max_chars() -> usize {
    100
}

fn default_suggested_tags() -> Vec<String> {
    COMMON_TAGS.iter().map(|t| t.to_string()).collect()
}

fn default_max_role_suggestions() -> usize {
    30
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            draft_key: default_draft_key(),
            history_key: default_history_key(),
            max_history_items: default_max_history_items(),
            default_public: default_public(),
            title_max_chars: default_title_max_chars(),
            suggested_tags: default_suggested_tags(),
            max_role_suggestions: default_max_role_suggestions(),
            submit_timeout_secs: None,
        }
    }
}

impl BuilderConfig {
    /// Load configuration from a JSON file.
    /// Returns default config if the file does not exist.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            WizardError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config: BuilderConfig = serde_json::from_str(&content).map_err(|e| {
            WizardError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the stores and composer cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.draft_key.trim().is_empty() {
            return Err(WizardError::Config("Draft key cannot be empty".to_string()));
        }
        if self.history_key.trim().is_empty() {
            return Err(WizardError::Config("History key cannot be empty".to_string()));
        }
        if self.draft_key == self.history_key {
            return Err(WizardError::Config(
                "Draft and history keys must differ".to_string(),
            ));
        }
        if self.title_max_chars == 0 {
            return Err(WizardError::Config("Title length must be >= 1".to_string()));
        }
        if self.submit_timeout_secs == Some(0) {
            return Err(WizardError::Config("Submit timeout must be >= 1s".to_string()));
        }
        Ok(())
    }
}
