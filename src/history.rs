//! Prompt analysis history
//!
//! Each time a prompt is analyzed and refined, the result is kept locally so
//! the history panel can show it even before the server has it. All prompts
//! share one storage slot holding the most recent analyses, newest first,
//! capped at a configurable maximum.

use crate::config::BuilderConfig;
use crate::error::{Result, WizardError};
use crate::state::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Scores returned by the analysis service (each 1-10)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptScore {
    pub overall_score: f64,
    pub clarity: f64,
    pub specificity: f64,
    pub effectiveness: f64,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Result of an analyze-and-refine call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRefinement {
    pub original_prompt: String,
    pub refined_prompt: String,
    pub score: PromptScore,
    #[serde(default)]
    pub improvements: Vec<String>,
}

/// Analysis details in the server's history format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDetails {
    pub overall_score: f64,
    pub clarity: f64,
    pub specificity: f64,
    pub effectiveness: f64,
    pub refined_prompt: String,
    #[serde(default)]
    pub improvements_made: Vec<String>,
    #[serde(default)]
    pub additional_suggestions: Vec<String>,
}

/// Token usage reported by the model; zero for locally recorded entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub prompt_token_count: u64,
    pub candidates_token_count: u64,
}

/// One history entry, shaped like the server's records (snake_case)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: i64,
    pub prompt_id: i64,
    pub generated_text: String,
    pub created_at: DateTime<Utc>,
    pub analysis: AnalysisDetails,
    #[serde(default)]
    pub usage_metadata: UsageMetadata,
}

impl AnalysisRecord {
    /// Local record for a refinement; the id is the creation time in ms
    pub fn from_refinement(prompt_id: i64, refinement: &PromptRefinement) -> Self {
        let created_at = Utc::now();
        Self {
            id: created_at.timestamp_millis(),
            prompt_id,
            generated_text: refinement.refined_prompt.clone(),
            created_at,
            analysis: AnalysisDetails {
                overall_score: refinement.score.overall_score,
                clarity: refinement.score.clarity,
                specificity: refinement.score.specificity,
                effectiveness: refinement.score.effectiveness,
                refined_prompt: refinement.refined_prompt.clone(),
                improvements_made: refinement.improvements.clone(),
                additional_suggestions: refinement.score.suggestions.clone(),
            },
            usage_metadata: UsageMetadata::default(),
        }
    }
}

/// Locally persisted analysis history
pub struct AnalysisHistory {
    backend: Arc<dyn KeyValueStore>,
    key: String,
    max_items: usize,
}

impl AnalysisHistory {
    pub fn new(backend: Arc<dyn KeyValueStore>, key: impl Into<String>, max_items: usize) -> Self {
        Self {
            backend,
            key: key.into(),
            max_items,
        }
    }

    /// History under `config.history_key`, capped at `config.max_history_items`
    pub fn from_config(backend: Arc<dyn KeyValueStore>, config: &BuilderConfig) -> Self {
        Self::new(backend, config.history_key.clone(), config.max_history_items)
    }

    /// Every stored record, surfacing read and parse failures
    pub fn try_load_all(&self) -> Result<Vec<AnalysisRecord>> {
        match self.backend.get(&self.key)? {
            Some(json) if !json.trim().is_empty() => Ok(serde_json::from_str(&json)?),
            _ => Ok(Vec::new()),
        }
    }

    /// Every stored record; unreadable content counts as empty
    pub fn load_all(&self) -> Vec<AnalysisRecord> {
        self.try_load_all().unwrap_or_else(|e| {
            tracing::warn!(key = %self.key, error = %e, "Discarding unreadable analysis history");
            Vec::new()
        })
    }

    /// Current records for a read-modify-write; `None` when the backend
    /// could not be read, in which case nothing may be written back
    fn load_for_update(&self) -> Option<Vec<AnalysisRecord>> {
        match self.try_load_all() {
            Ok(records) => Some(records),
            Err(WizardError::Serialization(e)) => {
                tracing::warn!(key = %self.key, error = %e, "Replacing unreadable analysis history");
                Some(Vec::new())
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Analysis history unavailable, skipping write");
                None
            }
        }
    }

    fn store_all(&self, records: &[AnalysisRecord]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.backend.set(&self.key, &json)
    }

    /// Record an analysis for a prompt, dropping the oldest beyond the cap
    ///
    /// The record is returned even when the backend cannot be read; it is
    /// then not persisted, so existing history is never overwritten blind.
    pub fn record(&self, prompt_id: i64, refinement: &PromptRefinement) -> AnalysisRecord {
        let mut record = AnalysisRecord::from_refinement(prompt_id, refinement);
        let Some(mut records) = self.load_for_update() else {
            return record;
        };

        // Two analyses in the same millisecond would share an id
        if let Some(max_id) = records.iter().map(|r| r.id).max() {
            if record.id <= max_id {
                record.id = max_id + 1;
            }
        }

        records.insert(0, record.clone());
        if self.max_items > 0 && records.len() > self.max_items {
            records.truncate(self.max_items);
        }

        match self.store_all(&records) {
            Ok(()) => tracing::debug!(
                prompt_id = prompt_id,
                id = record.id,
                total = records.len(),
                "Analysis recorded"
            ),
            Err(e) => tracing::warn!(key = %self.key, error = %e, "Failed to save analysis history"),
        }
        record
    }

    /// Records for one prompt, newest first
    pub fn for_prompt(&self, prompt_id: i64) -> Vec<AnalysisRecord> {
        let mut records: Vec<AnalysisRecord> = self
            .load_all()
            .into_iter()
            .filter(|r| r.prompt_id == prompt_id)
            .collect();
        sort_newest_first(&mut records);
        records
    }

    /// Server records plus local ones, newest first; server wins on id clashes
    pub fn merged(&self, prompt_id: i64, server: Vec<AnalysisRecord>) -> Vec<AnalysisRecord> {
        let server_ids: HashSet<i64> = server.iter().map(|r| r.id).collect();
        let mut records = server;
        records.extend(
            self.for_prompt(prompt_id)
                .into_iter()
                .filter(|r| !server_ids.contains(&r.id)),
        );
        sort_newest_first(&mut records);
        records
    }

    /// Forget the local history of one prompt
    pub fn clear_prompt(&self, prompt_id: i64) {
        let Some(records) = self.load_for_update() else {
            return;
        };
        let records: Vec<AnalysisRecord> = records
            .into_iter()
            .filter(|r| r.prompt_id != prompt_id)
            .collect();
        if let Err(e) = self.store_all(&records) {
            tracing::warn!(key = %self.key, prompt_id = prompt_id, error = %e, "Failed to clear analysis history");
        }
    }

    /// Forget all local history
    pub fn clear_all(&self) {
        if let Err(e) = self.backend.remove(&self.key) {
            tracing::warn!(key = %self.key, error = %e, "Failed to clear analysis history");
        }
    }

    /// Number of locally stored records across all prompts
    pub fn len(&self) -> usize {
        self.load_all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn sort_newest_first(records: &mut [AnalysisRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
