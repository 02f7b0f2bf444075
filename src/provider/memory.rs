//! In-memory providers for testing and single-process use

use super::{RoleDirectory, SubmissionSink};
use crate::compose::CreatePromptRequest;
use crate::config::BuilderConfig;
use crate::error::Result;
use crate::types::{SubmissionPayload, OTHER_ROLE};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Roles offered when the backend has none to give
pub const DEFAULT_ROLES: &[&str] = &[
    "Developer",
    "Product Manager",
    "Designer",
    "Data Analyst",
    "Marketing Manager",
    "Content Writer",
    "Business Analyst",
    "Project Manager",
    "Educator",
    "Researcher",
    "Sales Representative",
    "Technical Writer",
    OTHER_ROLE,
];

/// Fixed role list
#[derive(Debug, Clone)]
pub struct StaticRoleDirectory {
    roles: Vec<String>,
}

impl StaticRoleDirectory {
    pub fn new(roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for StaticRoleDirectory {
    fn default() -> Self {
        Self::new(DEFAULT_ROLES.iter().copied())
    }
}

#[async_trait]
impl RoleDirectory for StaticRoleDirectory {
    async fn roles(&self) -> Result<Vec<String>> {
        Ok(self.roles.clone())
    }
}

/// A prompt accepted by the memory sink
#[derive(Debug, Clone)]
pub struct StoredPrompt {
    /// Record id (prm-<uuid>)
    pub id: String,

    /// Request that would have been sent to the prompt API
    pub request: CreatePromptRequest,

    /// Payload as received from the wizard
    pub payload: SubmissionPayload,

    pub created_at: DateTime<Utc>,
}

/// Sink that keeps created prompts in a `Vec`
///
/// Clones share the same storage, so a test can keep a handle while the
/// wizard owns another.
#[derive(Clone)]
pub struct MemorySubmissionSink {
    prompts: Arc<RwLock<Vec<StoredPrompt>>>,
    title_max_chars: usize,
}

impl MemorySubmissionSink {
    pub fn new(title_max_chars: usize) -> Self {
        Self {
            prompts: Arc::new(RwLock::new(Vec::new())),
            title_max_chars,
        }
    }

    /// Sink whose titles follow `config.title_max_chars`
    pub fn from_config(config: &BuilderConfig) -> Self {
        Self::new(config.title_max_chars)
    }

    /// All accepted prompts, oldest first
    pub async fn list(&self) -> Vec<StoredPrompt> {
        self.prompts.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.prompts.read().await.len()
    }

    pub async fn get(&self, id: &str) -> Option<StoredPrompt> {
        let prompts = self.prompts.read().await;
        prompts.iter().find(|p| p.id == id).cloned()
    }
}

impl Default for MemorySubmissionSink {
    fn default() -> Self {
        Self::from_config(&BuilderConfig::default())
    }
}

#[async_trait]
impl SubmissionSink for MemorySubmissionSink {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<String> {
        let stored = StoredPrompt {
            id: format!("prm-{}", uuid::Uuid::new_v4()),
            request: CreatePromptRequest::from_payload(payload, self.title_max_chars),
            payload: payload.clone(),
            created_at: Utc::now(),
        };
        let id = stored.id.clone();

        tracing::debug!(id = %id, title = %stored.request.title, "Prompt stored");
        self.prompts.write().await.push(stored);
        Ok(id)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
