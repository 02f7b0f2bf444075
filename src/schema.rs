//! Draft schema: per-field validation rules
//!
//! Rules are pure predicates over a `Draft`. The wizard evaluates the subset
//! owned by the active step on every forward move and the whole schema at
//! submission. Each failing field reports exactly one message: required-ness
//! is checked before length bounds.

use crate::types::{Draft, Field, Role, Step};
use std::collections::BTreeMap;

/// Validation messages keyed by field, in field order
pub type FieldErrors = BTreeMap<Field, String>;

/// Minimum trimmed length of the goal
pub const GOAL_MIN_CHARS: usize = 10;

/// Minimum trimmed length of the context
pub const CONTEXT_MIN_CHARS: usize = 20;

/// Trimmed length bounds of a custom role
pub const CUSTOM_ROLE_MIN_CHARS: usize = 2;
pub const CUSTOM_ROLE_MAX_CHARS: usize = 50;

/// Rule for a single draft field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    /// Field this rule applies to
    pub field: Field,

    /// Human-readable name used in messages
    pub label: String,

    /// Whether a blank value fails
    pub required: bool,

    /// Inclusive lower bound on trimmed length, in characters
    pub min_chars: Option<usize>,

    /// Inclusive upper bound on trimmed length, in characters
    pub max_chars: Option<usize>,
}

impl FieldRule {
    /// An optional field with no bounds
    pub fn optional(field: Field, label: impl Into<String>) -> Self {
        Self {
            field,
            label: label.into(),
            required: false,
            min_chars: None,
            max_chars: None,
        }
    }

    /// A required field with no bounds
    pub fn required(field: Field, label: impl Into<String>) -> Self {
        Self {
            required: true,
            ..Self::optional(field, label)
        }
    }

    pub fn min(mut self, chars: usize) -> Self {
        self.min_chars = Some(chars);
        self
    }

    pub fn max(mut self, chars: usize) -> Self {
        self.max_chars = Some(chars);
        self
    }

    /// Check a value, returning the first violated rule's message
    pub fn check(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return self
                .required
                .then(|| format!("{} is required", self.label));
        }

        let len = trimmed.chars().count();
        if let Some(min) = self.min_chars {
            if len < min {
                return Some(format!("{} must be at least {} characters", self.label, min));
            }
        }
        if let Some(max) = self.max_chars {
            if len > max {
                return Some(format!("{} must be at most {} characters", self.label, max));
            }
        }
        None
    }
}

/// Full rule set for the prompt form
#[derive(Debug, Clone)]
pub struct DraftSchema {
    rules: Vec<FieldRule>,
}

impl Default for DraftSchema {
    fn default() -> Self {
        Self::standard()
    }
}

impl DraftSchema {
    /// The prompt builder's rules
    ///
    /// Output format, creativity and specificity are optional.
    pub fn standard() -> Self {
        Self {
            rules: vec![
                FieldRule::required(Field::Goal, "Goal").min(GOAL_MIN_CHARS),
                FieldRule::required(Field::Role, "Role"),
                FieldRule::required(Field::CustomRole, "Custom role")
                    .min(CUSTOM_ROLE_MIN_CHARS)
                    .max(CUSTOM_ROLE_MAX_CHARS),
                FieldRule::optional(Field::TargetAudience, "Target audience"),
                FieldRule::required(Field::Context, "Context").min(CONTEXT_MIN_CHARS),
                FieldRule::optional(Field::OutputFormat, "Output format"),
                FieldRule::optional(Field::Creativity, "Creativity level"),
                FieldRule::optional(Field::Specificity, "Specificity level"),
            ],
        }
    }

    /// Get the rule for a field, if one is registered
    pub fn rule(&self, field: Field) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.field == field)
    }

    /// Validate only the given fields
    pub fn validate_fields(&self, draft: &Draft, fields: &[Field]) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for field in fields {
            let Some(rule) = self.rule(*field) else {
                continue;
            };
            let Some(value) = field_value(draft, *field) else {
                continue;
            };
            if let Some(message) = rule.check(&value) {
                errors.insert(*field, message);
            }
        }
        errors
    }

    /// Validate the fields owned by a wizard step
    pub fn validate_step(&self, draft: &Draft, step: Step) -> FieldErrors {
        self.validate_fields(draft, step.fields())
    }

    /// Validate every field, as done at submission
    pub fn validate_all(&self, draft: &Draft) -> FieldErrors {
        self.validate_fields(draft, &Field::ALL)
    }
}

/// Text a rule sees for a field; `None` when the rule does not apply
fn field_value(draft: &Draft, field: Field) -> Option<String> {
    let value = match field {
        Field::Goal => draft.goal.clone(),
        // The dropdown holds "Other" for custom roles, which satisfies it
        Field::Role => draft.role.selection().to_string(),
        Field::CustomRole => match &draft.role {
            Role::Custom(text) => text.clone(),
            Role::Known(_) => return None,
        },
        Field::TargetAudience => draft.target_audience.clone(),
        Field::Context => draft.context.clone(),
        Field::OutputFormat => draft.output_format.map(|f| f.to_string()).unwrap_or_default(),
        Field::Tags => draft.tags.as_slice().join(","),
        Field::Creativity => draft.creativity.map(|c| c.to_string()).unwrap_or_default(),
        Field::Specificity => draft.specificity.map(|s| s.to_string()).unwrap_or_default(),
    };
    Some(value)
}
