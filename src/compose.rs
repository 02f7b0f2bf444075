//! Turn a submitted form into a prompt-creation request

use crate::types::SubmissionPayload;
use serde::{Deserialize, Serialize};

/// Body of the prompt API's create call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromptRequest {
    pub title: String,
    pub prompt_text: String,
    pub intended_use: String,
    pub target_audience: String,
    pub tags: Vec<String>,
    pub is_public: bool,
}

impl CreatePromptRequest {
    /// Build the request; the title is the goal cut to `title_max_chars`
    pub fn from_payload(payload: &SubmissionPayload, title_max_chars: usize) -> Self {
        Self {
            title: payload.goal.chars().take(title_max_chars).collect(),
            prompt_text: compose_prompt_text(payload),
            intended_use: payload.goal.clone(),
            target_audience: payload.target_audience.clone().unwrap_or_default(),
            tags: payload.tags.clone(),
            is_public: payload.is_public,
        }
    }
}

/// Render the prompt text sent to the model
pub fn compose_prompt_text(payload: &SubmissionPayload) -> String {
    let mut text = String::from("You are a helpful AI assistant");
    if !payload.role.is_empty() {
        text.push_str(&format!(" working with a {}", payload.role));
    }
    text.push_str(". Your task is to help with the following:\n\n");
    text.push_str(&format!("**Goal:** {}\n\n", payload.goal));

    if let Some(audience) = &payload.target_audience {
        text.push_str(&format!("**Target Audience:** {}\n\n", audience));
    }
    if !payload.context.is_empty() {
        text.push_str(&format!("**Context:** {}\n\n", payload.context));
    }
    if let Some(format) = payload.output_format {
        text.push_str(&format!(
            "**Output Format:** Please provide your response in {} format.\n\n",
            format.as_str().to_lowercase()
        ));
    }
    if let Some(creativity) = payload.creativity {
        text.push_str(&format!("**Creativity:** {}\n\n", creativity));
    }
    if let Some(specificity) = payload.specificity {
        text.push_str(&format!("**Level of Detail:** {}\n\n", specificity));
    }

    text.push_str(
        "Please provide a comprehensive and helpful response that addresses the goal \
         while being appropriate for the target audience.",
    );
    text
}
