//! External collaborators of the wizard
//!
//! The wizard never talks to the prompt API directly. It consults a
//! `RoleDirectory` for autocomplete and hands the finished form to a
//! `SubmissionSink`. The embedding application supplies real implementations;
//! `memory` provides in-process ones for tests and offline use.

use crate::error::Result;
use crate::types::SubmissionPayload;
use async_trait::async_trait;

pub mod memory;

/// Source of known professional roles
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// Ordered list of role names
    async fn roles(&self) -> Result<Vec<String>>;
}

/// Destination for finished prompts
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Persist the prompt, returning the created record's id
    async fn submit(&self, payload: &SubmissionPayload) -> Result<String>;

    /// Sink name (e.g., "memory", "http")
    fn name(&self) -> &str;
}
