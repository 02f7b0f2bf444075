//! # promptify-builder
//!
//! Guided prompt-builder core for Promptify.
//!
//! ## Overview
//!
//! `promptify-builder` drives the five-step wizard users follow to create an
//! AI prompt: goal and role, audience, context, output format and tags, and
//! generation parameters. It validates each step before moving on, keeps the
//! in-progress draft in local storage so nothing is lost between visits, and
//! hands the finished prompt to whatever backend the application plugs in.
//!
//! ## Quick Start
//!
//! ```rust
//! use promptify_builder::{BuilderConfig, MemoryKeyValueStore, MemorySubmissionSink,
//!     StaticRoleDirectory, Wizard, WizardContext};
//! use std::sync::Arc;
//!
//! # async fn example() -> promptify_builder::Result<()> {
//! let config = BuilderConfig::default();
//! let ctx = WizardContext::new(
//!     Arc::new(StaticRoleDirectory::default()),
//!     Arc::new(MemorySubmissionSink::from_config(&config)),
//!     Arc::new(MemoryKeyValueStore::new()),
//!     config,
//! );
//! let mut wizard = Wizard::new(ctx);
//!
//! wizard.set_goal("Generate 5 user stories for checkout flow");
//! wizard.select_role("Developer");
//! wizard.next()?;
//! wizard.next()?;
//! wizard.set_context("Mobile checkout drops 40% of users at payment");
//! wizard.next()?;
//! wizard.next()?;
//!
//! let id = wizard.submit().await?;
//! println!("Created: {}", id);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **Wizard**: step state machine with validation gating and draft persistence
//! - **DraftSchema**: per-field rules
//! - **DraftStore**: draft slot over a pluggable `KeyValueStore`
//! - **RoleDirectory** / **SubmissionSink**: collaborators supplied by the app
//! - **TemplateCatalog**: ready-made drafts to start from
//! - **AnalysisHistory**: locally kept prompt analyses

pub mod compose;
pub mod config;
pub mod error;
pub mod history;
pub mod provider;
pub mod schema;
pub mod state;
pub mod template;
pub mod types;
pub mod wizard;

// Re-export core types
pub use compose::{compose_prompt_text, CreatePromptRequest};
pub use config::BuilderConfig;
pub use error::{Result, WizardError};
pub use history::{AnalysisHistory, AnalysisRecord, PromptRefinement, PromptScore};
pub use provider::{RoleDirectory, SubmissionSink};
pub use schema::{DraftSchema, FieldErrors, FieldRule};
pub use state::{DraftStore, FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use template::{Difficulty, PromptTemplate, TemplateCatalog};
pub use types::{
    Creativity, Draft, Field, OutputFormat, Role, Specificity, Step, SubmissionPayload, TagSet,
    OTHER_ROLE,
};
pub use wizard::{Wizard, WizardContext, WizardState};

// Re-export providers for convenience
pub use provider::memory::{MemorySubmissionSink, StaticRoleDirectory};
