//! Guided prompt-builder wizard
//!
//! `Wizard` walks the user through five steps (goal and role, audience,
//! context, format and tags, parameters), gates every forward move on the
//! active step's rules, persists the draft on each transition, and hands the
//! finished payload to a `SubmissionSink`.
//!
//! Collaborators are passed in through `WizardContext` rather than looked up
//! globally, so a wizard can be driven entirely from tests.

use crate::config::BuilderConfig;
use crate::error::{Result, WizardError};
use crate::provider::{RoleDirectory, SubmissionSink};
use crate::schema::{DraftSchema, FieldErrors};
use crate::state::{DraftStore, KeyValueStore};
use crate::types::{
    Creativity, Draft, Field, OutputFormat, Role, Specificity, Step, SubmissionPayload, OTHER_ROLE,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Page-level message shown when the sink rejects a submission
pub const SUBMISSION_FAILED_NOTICE: &str = "Failed to create prompt. Please try again.";

/// Everything a wizard needs from the surrounding application
#[derive(Clone)]
pub struct WizardContext {
    /// Autocomplete source for the role field
    pub roles: Arc<dyn RoleDirectory>,

    /// Where finished prompts go
    pub sink: Arc<dyn SubmissionSink>,

    /// Draft slot in local storage
    pub store: DraftStore,

    /// Role the signed-in user picked previously, if any
    pub user_role: Option<String>,

    pub config: BuilderConfig,
}

impl WizardContext {
    /// Create a context whose draft lives under `config.draft_key`
    pub fn new(
        roles: Arc<dyn RoleDirectory>,
        sink: Arc<dyn SubmissionSink>,
        backend: Arc<dyn KeyValueStore>,
        config: BuilderConfig,
    ) -> Self {
        let store = DraftStore::new(backend, config.draft_key.clone());
        Self {
            roles,
            sink,
            store,
            user_role: None,
            config,
        }
    }

    /// Set the signed-in user's previous role
    pub fn with_user_role(mut self, role: impl Into<String>) -> Self {
        self.user_role = Some(role.into());
        self
    }
}

/// Snapshot of the transient UI state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub active_step_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_role_text: Option<String>,
    pub is_submitting: bool,
    pub field_errors: FieldErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Five-step prompt builder
pub struct Wizard {
    ctx: WizardContext,
    schema: DraftSchema,
    draft: Draft,
    step: Step,
    is_public: bool,
    is_submitting: bool,
    field_errors: FieldErrors,
    notice: Option<String>,
}

impl Wizard {
    /// Mount a wizard, restoring any draft left in the store
    pub fn new(ctx: WizardContext) -> Self {
        Self::mount(ctx, None)
    }

    /// Mount a wizard pre-filled from a template or other explicit draft
    ///
    /// The explicit draft wins over whatever is stored, including a stored
    /// custom role.
    pub fn with_initial(ctx: WizardContext, initial: Draft) -> Self {
        Self::mount(ctx, Some(initial))
    }

    fn mount(ctx: WizardContext, initial: Option<Draft>) -> Self {
        let (draft, source) = match initial {
            Some(draft) => (draft, "initial"),
            None => match ctx.store.load() {
                Some(draft) => (draft, "stored"),
                None => (Draft::default(), "empty"),
            },
        };
        let mut draft = seed_role(draft, ctx.user_role.as_deref());
        draft.role = draft.role.normalized();

        tracing::debug!(
            source = source,
            key = %ctx.store.key(),
            role = %draft.role.selection(),
            "Wizard mounted"
        );

        Self {
            is_public: ctx.config.default_public,
            ctx,
            schema: DraftSchema::standard(),
            draft,
            step: Step::Goal,
            is_submitting: false,
            field_errors: FieldErrors::new(),
            notice: None,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn active_step_index(&self) -> usize {
        self.step.index()
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    /// Messages from the last validation pass
    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn field_error(&self, field: Field) -> Option<&str> {
        self.field_errors.get(&field).map(String::as_str)
    }

    /// Text of the custom role field; `None` unless "Other" is selected
    pub fn custom_role_text(&self) -> Option<&str> {
        self.draft.role.custom_text()
    }

    /// Page-level notification left by a failed submission
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn context(&self) -> &WizardContext {
        &self.ctx
    }

    /// Snapshot of the transient UI state
    pub fn state(&self) -> WizardState {
        WizardState {
            active_step_index: self.step.index(),
            custom_role_text: self.custom_role_text().map(str::to_string),
            is_submitting: self.is_submitting,
            field_errors: self.field_errors.clone(),
            notice: self.notice.clone(),
        }
    }

    // ─── Edits ───────────────────────────────────────────────────

    pub fn set_goal(&mut self, goal: impl Into<String>) {
        self.draft.goal = goal.into();
    }

    /// Select a role from the dropdown/autocomplete
    ///
    /// Picking "Other" reveals the custom role field; picking anything else
    /// discards custom text.
    pub fn select_role(&mut self, selection: &str) {
        if selection == OTHER_ROLE && self.draft.role.is_custom() {
            return;
        }
        self.draft.role = Role::from_selection(selection);
    }

    /// Edit the custom role text; ignored unless "Other" is selected
    pub fn set_custom_role(&mut self, text: impl Into<String>) -> bool {
        match &mut self.draft.role {
            Role::Custom(current) => {
                *current = text.into();
                true
            }
            Role::Known(_) => false,
        }
    }

    pub fn set_target_audience(&mut self, audience: impl Into<String>) {
        self.draft.target_audience = audience.into();
    }

    pub fn set_context(&mut self, context: impl Into<String>) {
        self.draft.context = context.into();
    }

    pub fn set_output_format(&mut self, format: Option<OutputFormat>) {
        self.draft.output_format = format;
    }

    /// Add a tag; duplicates and blanks are no-ops
    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        self.draft.tags.insert(tag)
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.draft.tags.remove(tag)
    }

    pub fn set_creativity(&mut self, creativity: Option<Creativity>) {
        self.draft.creativity = creativity;
    }

    pub fn set_specificity(&mut self, specificity: Option<Specificity>) {
        self.draft.specificity = specificity;
    }

    pub fn set_public(&mut self, is_public: bool) {
        self.is_public = is_public;
    }

    // ─── Transitions ─────────────────────────────────────────────

    /// Validate the active step and move forward
    ///
    /// On success the draft is persisted before the step changes. On failure
    /// the draft is untouched and `field_errors` holds the messages.
    pub fn next(&mut self) -> Result<Step> {
        self.ensure_idle()?;
        let target = self.step.next().ok_or_else(|| {
            WizardError::InvalidTransition(format!("'{}' is the last step", self.step))
        })?;

        let errors = self.schema.validate_step(&self.draft, self.step);
        if !errors.is_empty() {
            tracing::debug!(
                step = self.step.index(),
                fields = ?errors.keys().collect::<Vec<_>>(),
                "Step validation failed"
            );
            self.field_errors = errors.clone();
            return Err(WizardError::Validation {
                step: self.step,
                errors,
            });
        }

        self.field_errors.clear();
        self.ctx.store.save(&self.draft);
        tracing::debug!(from = self.step.index(), to = target.index(), "Step advanced");
        self.step = target;
        Ok(target)
    }

    /// Move back one step; always allowed except from the first step
    pub fn back(&mut self) -> Result<Step> {
        self.ensure_idle()?;
        let target = self.step.prev().ok_or_else(|| {
            WizardError::InvalidTransition(format!("'{}' is the first step", self.step))
        })?;

        self.ctx.store.save(&self.draft);
        self.field_errors.clear();
        tracing::debug!(from = self.step.index(), to = target.index(), "Step reverted");
        self.step = target;
        Ok(target)
    }

    /// Validate everything and hand the payload to the sink
    ///
    /// Returns the created record's id. On success the stored draft is
    /// cleared and the wizard starts over. On sink failure the wizard stays on
    /// the last step with the draft intact so the user can retry.
    pub async fn submit(&mut self) -> Result<String> {
        self.ensure_idle()?;
        if !self.step.is_last() {
            return Err(WizardError::InvalidTransition(format!(
                "cannot submit from '{}'",
                self.step
            )));
        }

        let errors = self.schema.validate_all(&self.draft);
        if !errors.is_empty() {
            tracing::debug!(
                fields = ?errors.keys().collect::<Vec<_>>(),
                "Submission validation failed"
            );
            self.field_errors = errors.clone();
            return Err(WizardError::Validation {
                step: self.step,
                errors,
            });
        }
        self.field_errors.clear();
        self.notice = None;

        let payload = SubmissionPayload::from_draft(&self.draft, self.is_public);

        let in_flight = InFlight::start(&mut self.is_submitting);
        let outcome = send(&self.ctx, &payload).await;
        drop(in_flight);

        match outcome {
            Ok(id) => {
                self.ctx.store.clear();
                tracing::info!(
                    id = %id,
                    sink = %self.ctx.sink.name(),
                    role = %payload.role,
                    tags = payload.tags.len(),
                    "Prompt created"
                );
                self.reset();
                Ok(id)
            }
            Err(e) => {
                let err = match e {
                    WizardError::Submission(_) => e,
                    other => WizardError::Submission(other.to_string()),
                };
                tracing::warn!(
                    sink = %self.ctx.sink.name(),
                    error = %err,
                    "Prompt submission failed"
                );
                self.notice = Some(SUBMISSION_FAILED_NOTICE.to_string());
                Err(err)
            }
        }
    }

    // ─── Suggestions ─────────────────────────────────────────────

    /// Roles matching `query` (case-insensitive substring), in directory order
    ///
    /// Directory failures only cost the suggestions.
    pub async fn role_suggestions(&self, query: &str) -> Vec<String> {
        let roles = match self.ctx.roles.roles().await {
            Ok(roles) => roles,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch roles");
                return Vec::new();
            }
        };

        let query = query.trim().to_lowercase();
        roles
            .into_iter()
            .filter(|role| query.is_empty() || role.to_lowercase().contains(&query))
            .take(self.ctx.config.max_role_suggestions)
            .collect()
    }

    /// Suggested tags matching `query` that are not already on the draft
    pub fn tag_suggestions(&self, query: &str) -> Vec<String> {
        let query = query.trim().to_lowercase();
        self.ctx
            .config
            .suggested_tags
            .iter()
            .filter(|tag| !self.draft.tags.contains(tag))
            .filter(|tag| query.is_empty() || tag.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.is_submitting {
            return Err(WizardError::Busy);
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.draft = seed_role(Draft::default(), self.ctx.user_role.as_deref());
        self.step = Step::Goal;
        self.is_public = self.ctx.config.default_public;
        self.field_errors.clear();
        self.notice = None;
    }
}

/// Hand the payload to the sink, honoring the configured timeout
async fn send(ctx: &WizardContext, payload: &SubmissionPayload) -> Result<String> {
    let submission = ctx.sink.submit(payload);
    match ctx.config.submit_timeout_secs {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), submission)
            .await
            .map_err(|_| {
                WizardError::Submission(format!(
                    "'{}' did not answer within {}s",
                    ctx.sink.name(),
                    secs
                ))
            })?,
        None => submission.await,
    }
}

/// Holds `is_submitting` up while a sink call is pending
///
/// Clears the flag on drop, so a `submit` future dropped mid-await leaves the
/// wizard usable.
struct InFlight<'a> {
    flag: &'a mut bool,
}

impl<'a> InFlight<'a> {
    fn start(flag: &'a mut bool) -> Self {
        *flag = true;
        Self { flag }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.flag = false;
    }
}

/// Fill an unset role from the signed-in user's previous choice
fn seed_role(mut draft: Draft, user_role: Option<&str>) -> Draft {
    if !draft.role.is_unset() {
        return draft;
    }
    if let Some(role) = user_role.map(str::trim).filter(|r| !r.is_empty() && *r != OTHER_ROLE) {
        draft.role = Role::Known(role.to_string());
    }
    draft
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::memory::{MemorySubmissionSink, StaticRoleDirectory};
    use crate::state::MemoryKeyValueStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Sink that fails a fixed number of times before succeeding
    struct FlakySink {
        failures_left: AtomicUsize,
        calls: AtomicUsize,
    }

    impl FlakySink {
        fn new(failures: usize) -> Self {
            Self {
                failures_left: AtomicUsize::new(failures),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SubmissionSink for FlakySink {
        async fn submit(&self, _payload: &SubmissionPayload) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let left = self.failures_left.load(Ordering::SeqCst);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::SeqCst);
                return Err(WizardError::Connection("network unreachable".to_string()));
            }
            Ok("prm-flaky".to_string())
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    fn context(backend: &MemoryKeyValueStore, sink: Arc<dyn SubmissionSink>) -> WizardContext {
        WizardContext::new(
            Arc::new(StaticRoleDirectory::default()),
            sink,
            Arc::new(backend.clone()),
            BuilderConfig::default(),
        )
    }

    fn memory_wizard() -> (MemoryKeyValueStore, Wizard) {
        let backend = MemoryKeyValueStore::new();
        let ctx = context(&backend, Arc::new(MemorySubmissionSink::default()));
        (backend, Wizard::new(ctx))
    }

    fn fill_to_last_step(wizard: &mut Wizard) {
        wizard.set_goal("Generate 5 user stories for checkout flow");
        wizard.select_role("Developer");
        wizard.next().unwrap();
        wizard.next().unwrap();
        wizard.set_context("Mobile checkout drops 40% of users at payment");
        wizard.next().unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.step(), Step::Parameters);
    }

    #[test]
    fn test_starts_empty_on_first_step() {
        let (_, wizard) = memory_wizard();
        assert_eq!(wizard.active_step_index(), 0);
        assert!(wizard.draft().is_empty());
        assert!(wizard.is_public());
        assert!(!wizard.is_submitting());
    }

    #[test]
    fn test_next_blocked_keeps_draft_and_reports_errors() {
        let (backend, mut wizard) = memory_wizard();
        wizard.set_goal("short");

        let err = wizard.next().unwrap_err();
        assert!(matches!(err, WizardError::Validation { step: Step::Goal, .. }));
        assert_eq!(wizard.step(), Step::Goal);
        assert_eq!(wizard.draft().goal, "short");
        assert_eq!(
            wizard.field_error(Field::Goal),
            Some("Goal must be at least 10 characters")
        );
        assert_eq!(wizard.field_error(Field::Role), Some("Role is required"));
        assert!(backend.is_empty());
    }

    #[test]
    fn test_next_persists_before_advancing() {
        let (backend, mut wizard) = memory_wizard();
        wizard.set_goal("Draft a launch announcement");
        wizard.select_role("Marketing Manager");

        assert_eq!(wizard.next().unwrap(), Step::Audience);
        assert!(wizard.field_errors().is_empty());

        let stored = wizard.context().store.load().unwrap();
        assert_eq!(stored.goal, "Draft a launch announcement");
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_errors_cleared_by_successful_pass() {
        let (_, mut wizard) = memory_wizard();
        assert!(wizard.next().is_err());
        assert!(!wizard.field_errors().is_empty());

        wizard.set_goal("A goal with enough characters");
        wizard.select_role("Designer");
        wizard.next().unwrap();
        assert!(wizard.field_errors().is_empty());
    }

    #[test]
    fn test_back_persists_and_is_unconditional() {
        let (_, mut wizard) = memory_wizard();
        wizard.set_goal("Plan a team offsite agenda");
        wizard.select_role("Project Manager");
        wizard.next().unwrap();
        wizard.next().unwrap();

        wizard.set_context("short");
        assert_eq!(wizard.back().unwrap(), Step::Audience);
        assert_eq!(wizard.context().store.load().unwrap().context, "short");
    }

    #[test]
    fn test_back_from_first_step_rejected() {
        let (_, mut wizard) = memory_wizard();
        assert!(matches!(wizard.back(), Err(WizardError::InvalidTransition(_))));
    }

    #[test]
    fn test_next_from_last_step_rejected() {
        let (_, mut wizard) = memory_wizard();
        fill_to_last_step(&mut wizard);
        assert!(matches!(wizard.next(), Err(WizardError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn test_submit_only_from_last_step() {
        let (_, mut wizard) = memory_wizard();
        let err = wizard.submit().await.unwrap_err();
        assert!(matches!(err, WizardError::InvalidTransition(_)));
    }

    #[test]
    fn test_custom_role_gates_first_step() {
        let (_, mut wizard) = memory_wizard();
        wizard.set_goal("Write onboarding docs for new hires");
        wizard.select_role("Other");
        assert_eq!(wizard.custom_role_text(), Some(""));

        assert!(wizard.next().is_err());
        assert_eq!(wizard.field_error(Field::CustomRole), Some("Custom role is required"));

        wizard.set_custom_role("x");
        assert!(wizard.next().is_err());

        wizard.set_custom_role("x".repeat(51));
        assert!(wizard.next().is_err());

        wizard.set_custom_role("  People Ops  ");
        assert_eq!(wizard.next().unwrap(), Step::Audience);
    }

    #[test]
    fn test_switching_away_from_other_drops_custom_text() {
        let (_, mut wizard) = memory_wizard();
        wizard.select_role("Other");
        assert!(wizard.set_custom_role("Archivist"));

        wizard.select_role("Other");
        assert_eq!(wizard.custom_role_text(), Some("Archivist"));

        wizard.select_role("Educator");
        assert_eq!(wizard.custom_role_text(), None);
        assert!(!wizard.set_custom_role("ignored"));

        wizard.select_role("Other");
        assert_eq!(wizard.custom_role_text(), Some(""));
    }

    #[test]
    fn test_hydrates_from_store() {
        let backend = MemoryKeyValueStore::new();
        let ctx = context(&backend, Arc::new(MemorySubmissionSink::default()));
        ctx.store.save(&Draft {
            goal: "Resume where I left off".to_string(),
            role: Role::Custom("Curator".to_string()),
            ..Draft::default()
        });

        let wizard = Wizard::new(ctx);
        assert_eq!(wizard.draft().goal, "Resume where I left off");
        assert_eq!(wizard.custom_role_text(), Some("Curator"));
        assert_eq!(wizard.step(), Step::Goal);
    }

    #[test]
    fn test_initial_draft_beats_stored_draft() {
        let backend = MemoryKeyValueStore::new();
        let ctx = context(&backend, Arc::new(MemorySubmissionSink::default()));
        ctx.store.save(&Draft {
            goal: "Stored goal text".to_string(),
            role: Role::Custom("Stored custom".to_string()),
            ..Draft::default()
        });

        let initial = Draft {
            goal: "Template goal text".to_string(),
            role: Role::Known("Educator".to_string()),
            ..Draft::default()
        };
        let wizard = Wizard::with_initial(ctx, initial);
        assert_eq!(wizard.draft().goal, "Template goal text");
        assert_eq!(wizard.draft().role, Role::Known("Educator".to_string()));
        assert_eq!(wizard.custom_role_text(), None);
    }

    #[test]
    fn test_bare_other_role_mounts_as_custom() {
        let backend = MemoryKeyValueStore::new();
        let ctx = context(&backend, Arc::new(MemorySubmissionSink::default()));
        backend
            .set(ctx.store.key(), r#"{"goal":"Pick up later","role":"Other"}"#)
            .unwrap();

        let mut wizard = Wizard::new(ctx);
        assert_eq!(wizard.custom_role_text(), Some(""));
        assert!(wizard.set_custom_role("Archivist"));

        let initial = Draft {
            role: Role::Known(OTHER_ROLE.to_string()),
            ..Draft::default()
        };
        let wizard = Wizard::with_initial(wizard.context().clone(), initial);
        assert_eq!(wizard.custom_role_text(), Some(""));
    }

    #[test]
    fn test_role_priority() {
        let backend = MemoryKeyValueStore::new();

        // user role fills an empty draft
        let ctx = context(&backend, Arc::new(MemorySubmissionSink::default()))
            .with_user_role("Researcher");
        let wizard = Wizard::new(ctx.clone());
        assert_eq!(wizard.draft().role, Role::Known("Researcher".to_string()));

        // stored role beats user role
        ctx.store.save(&Draft {
            role: Role::Known("Designer".to_string()),
            ..Draft::default()
        });
        let wizard = Wizard::new(ctx.clone());
        assert_eq!(wizard.draft().role, Role::Known("Designer".to_string()));

        // explicit role beats both
        let initial = Draft {
            role: Role::Known("Educator".to_string()),
            ..Draft::default()
        };
        let wizard = Wizard::with_initial(ctx.clone(), initial);
        assert_eq!(wizard.draft().role, Role::Known("Educator".to_string()));

        // explicit draft without a role falls back to the user role, not the store
        let wizard = Wizard::with_initial(ctx, Draft::default());
        assert_eq!(wizard.draft().role, Role::Known("Researcher".to_string()));
    }

    #[tokio::test]
    async fn test_submit_success_clears_store_and_resets() {
        let backend = MemoryKeyValueStore::new();
        let sink = MemorySubmissionSink::default();
        let mut wizard = Wizard::new(context(&backend, Arc::new(sink.clone())));
        fill_to_last_step(&mut wizard);
        wizard.add_tag("product");
        wizard.set_public(false);

        let id = wizard.submit().await.unwrap();
        assert!(id.starts_with("prm-"));
        assert!(backend.is_empty());
        assert_eq!(wizard.step(), Step::Goal);
        assert!(wizard.draft().is_empty());
        assert!(wizard.is_public());

        let stored = sink.get(&id).await.unwrap();
        assert_eq!(stored.payload.role, "Developer");
        assert_eq!(stored.payload.tags, vec!["product"]);
        assert!(!stored.payload.is_public);
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_everything_for_retry() {
        let backend = MemoryKeyValueStore::new();
        let sink = Arc::new(FlakySink::new(1));
        let mut wizard = Wizard::new(context(&backend, sink.clone()));
        fill_to_last_step(&mut wizard);
        let before = wizard.draft().clone();

        let err = wizard.submit().await.unwrap_err();
        assert!(matches!(err, WizardError::Submission(_)));
        assert!(err.to_string().contains("network unreachable"));
        assert_eq!(wizard.active_step_index(), 4);
        assert!(!wizard.is_submitting());
        assert_eq!(wizard.draft(), &before);
        assert_eq!(wizard.notice(), Some(SUBMISSION_FAILED_NOTICE));
        assert!(wizard.context().store.load().is_some());

        let id = wizard.submit().await.unwrap();
        assert_eq!(id, "prm-flaky");
        assert_eq!(sink.calls.load(Ordering::SeqCst), 2);
        assert!(wizard.notice().is_none());
        assert!(wizard.context().store.load().is_none());
    }

    struct StalledSink;

    #[async_trait]
    impl SubmissionSink for StalledSink {
        async fn submit(&self, _payload: &SubmissionPayload) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("prm-late".to_string())
        }

        fn name(&self) -> &str {
            "stalled"
        }
    }

    #[tokio::test]
    async fn test_submit_timeout_is_a_submission_failure() {
        let backend = MemoryKeyValueStore::new();
        let mut ctx = context(&backend, Arc::new(StalledSink));
        ctx.config.submit_timeout_secs = Some(1);
        let mut wizard = Wizard::new(ctx);
        fill_to_last_step(&mut wizard);

        let err = wizard.submit().await.unwrap_err();
        assert!(matches!(err, WizardError::Submission(_)));
        assert!(err.to_string().contains("within 1s"));
        assert!(!wizard.is_submitting());
        assert_eq!(wizard.step(), Step::Parameters);
        assert_eq!(wizard.notice(), Some(SUBMISSION_FAILED_NOTICE));
    }

    #[tokio::test]
    async fn test_dropped_submit_leaves_wizard_usable() {
        let backend = MemoryKeyValueStore::new();
        let mut wizard = Wizard::new(context(&backend, Arc::new(StalledSink)));
        fill_to_last_step(&mut wizard);
        let before = wizard.draft().clone();

        let abandoned =
            tokio::time::timeout(Duration::from_millis(50), wizard.submit()).await;
        assert!(abandoned.is_err());

        assert!(!wizard.is_submitting());
        assert_eq!(wizard.draft(), &before);
        assert_eq!(wizard.back().unwrap(), Step::Format);
        assert_eq!(wizard.context().store.load(), Some(before));
    }

    #[tokio::test]
    async fn test_submit_runs_full_validation() {
        let (_, mut wizard) = memory_wizard();
        fill_to_last_step(&mut wizard);
        wizard.set_context("too short");

        let err = wizard.submit().await.unwrap_err();
        match err {
            WizardError::Validation { step, errors } => {
                assert_eq!(step, Step::Parameters);
                assert!(errors.contains_key(&Field::Context));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(wizard.step(), Step::Parameters);
    }

    #[tokio::test]
    async fn test_role_suggestions_filter_and_cap() {
        let backend = MemoryKeyValueStore::new();
        let mut ctx = context(&backend, Arc::new(MemorySubmissionSink::default()));
        ctx.config.max_role_suggestions = 2;
        let wizard = Wizard::new(ctx);

        let matches = wizard.role_suggestions("MAN").await;
        assert_eq!(matches, vec!["Product Manager", "Marketing Manager"]);

        let all = wizard.role_suggestions("").await;
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_tag_suggestions_skip_existing() {
        let (_, mut wizard) = memory_wizard();
        wizard.add_tag("coding");
        let suggestions = wizard.tag_suggestions("co");
        assert!(!suggestions.contains(&"coding".to_string()));

        let suggestions = wizard.tag_suggestions("");
        assert_eq!(suggestions.len(), crate::types::COMMON_TAGS.len() - 1);
    }

    #[test]
    fn test_state_snapshot() {
        let (_, mut wizard) = memory_wizard();
        wizard.select_role("Other");
        wizard.set_custom_role("Analyst");
        let _ = wizard.next();

        let state = wizard.state();
        assert_eq!(state.active_step_index, 0);
        assert_eq!(state.custom_role_text.as_deref(), Some("Analyst"));
        assert!(state.field_errors.contains_key(&Field::Goal));

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["activeStepIndex"], 0);
        assert_eq!(json["fieldErrors"]["goal"], "Goal is required");
    }
}
