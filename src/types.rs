//! Core prompt-builder types
//!
//! All types use camelCase JSON serialization, matching what the web client
//! keeps in local storage and sends to the prompt API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dropdown value that unlocks the free-text custom role field
pub const OTHER_ROLE: &str = "Other";

/// Tags offered for autocomplete. Advisory only: any tag is accepted.
pub const COMMON_TAGS: &[&str] = &[
    "productivity",
    "writing",
    "coding",
    "analysis",
    "creative",
    "business",
    "technical",
    "educational",
    "marketing",
    "research",
];

/// Wizard steps in the order the user walks through them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    Goal,
    Audience,
    Context,
    Format,
    Parameters,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::Goal,
        Step::Audience,
        Step::Context,
        Step::Format,
        Step::Parameters,
    ];

    /// Zero-based position of the step (the `activeStepIndex`)
    pub fn index(self) -> usize {
        match self {
            Step::Goal => 0,
            Step::Audience => 1,
            Step::Context => 2,
            Step::Format => 3,
            Step::Parameters => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Step> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Option<Step> {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Option<Step> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn is_last(self) -> bool {
        self == Step::Parameters
    }

    /// Label shown in the stepper header
    pub fn title(self) -> &'static str {
        match self {
            Step::Goal => "Define Goal",
            Step::Audience => "Set Audience",
            Step::Context => "Add Context",
            Step::Format => "Choose Format",
            Step::Parameters => "Configure Parameters",
        }
    }

    /// Draft fields owned by this step
    pub fn fields(self) -> &'static [Field] {
        match self {
            Step::Goal => &[Field::Goal, Field::Role, Field::CustomRole],
            Step::Audience => &[Field::TargetAudience],
            Step::Context => &[Field::Context],
            Step::Format => &[Field::OutputFormat, Field::Tags],
            Step::Parameters => &[Field::Creativity, Field::Specificity],
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Draft field identifiers, used as keys for validation messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Goal,
    Role,
    CustomRole,
    TargetAudience,
    Context,
    OutputFormat,
    Tags,
    Creativity,
    Specificity,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Goal,
        Field::Role,
        Field::CustomRole,
        Field::TargetAudience,
        Field::Context,
        Field::OutputFormat,
        Field::Tags,
        Field::Creativity,
        Field::Specificity,
    ];

    /// Field name as it appears in the JSON form data
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Goal => "goal",
            Field::Role => "role",
            Field::CustomRole => "customRole",
            Field::TargetAudience => "targetAudience",
            Field::Context => "context",
            Field::OutputFormat => "outputFormat",
            Field::Tags => "tags",
            Field::Creativity => "creativity",
            Field::Specificity => "specificity",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declares a closed set of dropdown choices that serialize as their labels
macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = crate::error::WizardError;

            fn from_str(s: &str) -> crate::error::Result<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|choice| choice.as_str() == s)
                    .ok_or_else(|| {
                        crate::error::WizardError::NotFound(format!(
                            "Unknown {} '{}'",
                            stringify!($name),
                            s
                        ))
                    })
            }
        }
    };
}

choice_enum! {
    /// How the AI should structure its response
    OutputFormat {
        Paragraph => "Paragraph",
        BulletPoints => "Bullet Points",
        StepByStep => "Step-by-step Instructions",
        Code => "Code",
        EmailTemplate => "Email Template",
        Report => "Report",
        List => "List",
        Table => "Table",
        Json => "JSON",
        Markdown => "Markdown",
    }
}

choice_enum! {
    /// Creativity level requested from the model
    Creativity {
        Conservative => "Conservative",
        Balanced => "Balanced",
        Creative => "Creative",
        HighlyCreative => "Highly Creative",
        Experimental => "Experimental",
    }
}

choice_enum! {
    /// Level of detail requested from the model
    Specificity {
        General => "General",
        ModeratelySpecific => "Moderately Specific",
        Specific => "Specific",
        VerySpecific => "Very Specific",
        HighlyDetailed => "Highly Detailed",
    }
}

/// Professional role the prompt is written for
///
/// `Custom` is what the "Other" dropdown entry turns into: the free text lives
/// here and only replaces the role name when the payload is assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Known(String),
    Custom(String),
}

impl Default for Role {
    fn default() -> Self {
        Role::Known(String::new())
    }
}

impl Role {
    /// Build a role from a dropdown/autocomplete selection
    pub fn from_selection(value: impl Into<String>) -> Self {
        let value = value.into();
        if value == OTHER_ROLE {
            Role::Custom(String::new())
        } else {
            Role::Known(value)
        }
    }

    /// The value the role dropdown displays
    pub fn selection(&self) -> &str {
        match self {
            Role::Known(name) => name,
            Role::Custom(_) => OTHER_ROLE,
        }
    }

    /// Free text behind "Other", if that is what was selected
    pub fn custom_text(&self) -> Option<&str> {
        match self {
            Role::Known(_) => None,
            Role::Custom(text) => Some(text),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Role::Custom(_))
    }

    /// Whether nothing has been chosen yet
    pub fn is_unset(&self) -> bool {
        matches!(self, Role::Known(name) if name.trim().is_empty())
    }

    /// `Known("Other")` as the dropdown means it: a custom role awaiting text
    pub fn normalized(self) -> Self {
        match self {
            Role::Known(name) if name == OTHER_ROLE => Role::Custom(String::new()),
            other => other,
        }
    }

    /// Flatten to the single role string sent to the API
    pub fn resolve(&self) -> String {
        match self {
            Role::Known(name) => name.trim().to_string(),
            Role::Custom(text) => text.trim().to_string(),
        }
    }
}

/// Tag list with set semantics and insertion-order display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag; returns false for blanks and exact duplicates
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into().trim().to_string();
        if tag.is_empty() || self.contains(&tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|t| t != tag);
        self.0.len() != before
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tags = TagSet::new();
        for tag in iter {
            tags.insert(tag);
        }
        tags
    }
}

/// In-progress prompt form
///
/// Any field may be empty while drafting; `goal`, `role` and `context` are
/// only enforced at submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DraftRecord", into = "DraftRecord")]
pub struct Draft {
    pub goal: String,
    pub role: Role,
    pub target_audience: String,
    pub context: String,
    pub output_format: Option<OutputFormat>,
    pub tags: TagSet,
    pub creativity: Option<Creativity>,
    pub specificity: Option<Specificity>,
}

impl Draft {
    /// Whether every field is still at its default
    pub fn is_empty(&self) -> bool {
        *self == Draft::default()
    }
}

/// Storage shape of a draft: the role is a plain string plus the custom text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DraftRecord {
    goal: String,
    target_audience: String,
    context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_format: Option<OutputFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    creativity: Option<Creativity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    specificity: Option<Specificity>,
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_role: Option<String>,
    tags: Vec<String>,
}

impl From<DraftRecord> for Draft {
    fn from(record: DraftRecord) -> Self {
        // `customRole` is written for every custom role, even an empty one
        let role = match record.custom_role {
            Some(text) if record.role == OTHER_ROLE => Role::Custom(text),
            _ => Role::Known(record.role),
        };
        Self {
            goal: record.goal,
            role,
            target_audience: record.target_audience,
            context: record.context,
            output_format: record.output_format,
            tags: record.tags.into_iter().collect(),
            creativity: record.creativity,
            specificity: record.specificity,
        }
    }
}

impl From<Draft> for DraftRecord {
    fn from(draft: Draft) -> Self {
        let (role, custom_role) = match draft.role {
            Role::Known(name) => (name, None),
            Role::Custom(text) => (OTHER_ROLE.to_string(), Some(text)),
        };
        Self {
            goal: draft.goal,
            target_audience: draft.target_audience,
            context: draft.context,
            output_format: draft.output_format,
            creativity: draft.creativity,
            specificity: draft.specificity,
            role,
            custom_role,
            tags: draft.tags.0,
        }
    }
}

/// Finished form handed to the submission sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub goal: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,

    pub context: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,

    pub tags: Vec<String>,

    /// Resolved role; custom text replaces "Other" here
    pub role: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creativity: Option<Creativity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specificity: Option<Specificity>,

    /// Visibility of the created prompt
    pub is_public: bool,
}

impl SubmissionPayload {
    /// Assemble the payload from a validated draft
    pub fn from_draft(draft: &Draft, is_public: bool) -> Self {
        let audience = draft.target_audience.trim();
        Self {
            goal: draft.goal.trim().to_string(),
            target_audience: (!audience.is_empty()).then(|| audience.to_string()),
            context: draft.context.trim().to_string(),
            output_format: draft.output_format,
            tags: draft.tags.as_slice().to_vec(),
            role: draft.role.resolve(),
            creativity: draft.creativity,
            specificity: draft.specificity,
            is_public,
        }
    }
}
