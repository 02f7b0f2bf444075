//! Built-in prompt templates
//!
//! A template pre-fills the wizard through `Wizard::with_initial`. The catalog
//! is read-only and lives in memory.

use crate::error::{Result, WizardError};
use crate::types::{Creativity, Draft, OutputFormat, Role, Specificity};
use serde::{Deserialize, Serialize};

/// Recommendations returned by `TemplateCatalog::recommended`
pub const MAX_RECOMMENDATIONS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// A ready-made starting point for the wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptTemplate {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Category id (e.g., "business", "technical")
    pub category: String,
    /// Form values without tags
    pub form: Draft,
    pub tags: Vec<String>,
    pub difficulty: Difficulty,
    pub estimated_time: String,
    pub use_cases: Vec<String>,
}

impl PromptTemplate {
    /// Draft the wizard should start from, tags included
    pub fn to_draft(&self) -> Draft {
        let mut draft = self.form.clone();
        for tag in &self.tags {
            draft.tags.insert(tag.clone());
        }
        draft
    }

    fn role_name(&self) -> String {
        self.form.role.resolve().to_lowercase()
    }

    fn matches(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(query)
            || self.description.to_lowercase().contains(query)
            || self.tags.iter().any(|t| t.to_lowercase().contains(query))
            || self.use_cases.iter().any(|u| u.to_lowercase().contains(query))
    }
}

/// Category grouping for the template picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateCategory {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Read-only template catalog
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    categories: Vec<TemplateCategory>,
    templates: Vec<PromptTemplate>,
}

impl TemplateCatalog {
    pub fn new(categories: Vec<TemplateCategory>, templates: Vec<PromptTemplate>) -> Self {
        Self {
            categories,
            templates,
        }
    }

    /// Catalog shipped with the builder
    pub fn builtin() -> Self {
        let categories = vec![
            category("business", "Business & Strategy", "Planning, strategy, and operations"),
            category("technical", "Technical & Development", "Code, architecture, and documentation"),
            category("creative", "Creative & Content", "Writing and content creation"),
            category("marketing", "Marketing & Sales", "Campaigns, copy, and customer insight"),
            category("education", "Education & Training", "Teaching and learning material"),
        ];

        let templates = vec![
            template(
                "business-plan",
                "Business Plan Generator",
                "Create comprehensive business plans with market analysis and financial projections",
                "business",
                TemplateForm {
                    goal: "Generate a comprehensive business plan for [business idea] including executive summary, market analysis, financial projections, and growth strategy",
                    audience: "Entrepreneurs and business owners",
                    context: "I'm starting a new business and need a structured plan to present to investors and stakeholders",
                    format: OutputFormat::Report,
                    creativity: Creativity::Balanced,
                    specificity: Specificity::HighlyDetailed,
                    role: "Business Consultant",
                },
                &["business", "planning", "strategy", "finance"],
                Difficulty::Advanced,
                "30-45 minutes",
                &["Startup planning", "Investor presentations", "Strategic planning"],
            ),
            template(
                "swot-analysis",
                "SWOT Analysis",
                "Conduct thorough SWOT analysis for business decisions",
                "business",
                TemplateForm {
                    goal: "Perform a detailed SWOT analysis for [company/product] identifying strengths, weaknesses, opportunities, and threats",
                    audience: "Business leaders and strategists",
                    context: "We need to evaluate our competitive position before entering a new market segment",
                    format: OutputFormat::Table,
                    creativity: Creativity::Conservative,
                    specificity: Specificity::VerySpecific,
                    role: "Business Analyst",
                },
                &["business", "analysis", "strategy"],
                Difficulty::Intermediate,
                "15-20 minutes",
                &["Strategic planning", "Competitive analysis", "Decision making"],
            ),
            template(
                "code-review",
                "Code Review Assistant",
                "Get thorough code reviews with best practices and improvement suggestions",
                "technical",
                TemplateForm {
                    goal: "Review the provided code for best practices, potential bugs, performance issues, and maintainability",
                    audience: "Software developers",
                    context: "The code is part of a production service and will be maintained by a team of several engineers",
                    format: OutputFormat::BulletPoints,
                    creativity: Creativity::Conservative,
                    specificity: Specificity::HighlyDetailed,
                    role: "Senior Software Engineer",
                },
                &["coding", "review", "best-practices"],
                Difficulty::Intermediate,
                "10-15 minutes",
                &["Code quality", "Mentoring", "Pre-merge checks"],
            ),
            template(
                "api-documentation",
                "API Documentation Generator",
                "Create clear, complete API documentation",
                "technical",
                TemplateForm {
                    goal: "Write comprehensive documentation for [API name] covering endpoints, parameters, responses, and examples",
                    audience: "Developers and API consumers",
                    context: "The API is public and external developers need to integrate with it without direct support",
                    format: OutputFormat::Markdown,
                    creativity: Creativity::Conservative,
                    specificity: Specificity::HighlyDetailed,
                    role: "Technical Writer",
                },
                &["documentation", "api", "technical"],
                Difficulty::Intermediate,
                "20-30 minutes",
                &["API development", "Developer onboarding", "Documentation"],
            ),
            template(
                "blog-post",
                "Blog Post Creator",
                "Write engaging blog posts on any topic",
                "creative",
                TemplateForm {
                    goal: "Write an engaging blog post about [topic] that informs readers and encourages them to take action",
                    audience: "General online readers",
                    context: "The blog targets curious non-experts and posts are usually shared on social media",
                    format: OutputFormat::Markdown,
                    creativity: Creativity::Creative,
                    specificity: Specificity::Specific,
                    role: "Content Writer",
                },
                &["writing", "blog", "content"],
                Difficulty::Intermediate,
                "20-30 minutes",
                &["Content marketing", "Thought leadership", "SEO"],
            ),
            template(
                "social-media",
                "Social Media Content Creator",
                "Create posts tailored to each social platform",
                "creative",
                TemplateForm {
                    goal: "Create a set of social media posts announcing [news] with hooks and hashtags",
                    audience: "Followers on LinkedIn, Twitter, and Instagram",
                    context: "Each platform has a different tone and length limit and we want consistent messaging",
                    format: OutputFormat::List,
                    creativity: Creativity::HighlyCreative,
                    specificity: Specificity::ModeratelySpecific,
                    role: "Social Media Manager",
                },
                &["social", "marketing", "creative"],
                Difficulty::Beginner,
                "5-10 minutes",
                &["Product launches", "Brand awareness", "Community engagement"],
            ),
            template(
                "email-campaign",
                "Email Marketing Campaign",
                "Design email sequences that convert",
                "marketing",
                TemplateForm {
                    goal: "Design a three-email campaign promoting [product] to re-engage inactive customers",
                    audience: "Customers who have not purchased in six months",
                    context: "Previous campaigns had low open rates and we want stronger subject lines and clearer calls to action",
                    format: OutputFormat::EmailTemplate,
                    creativity: Creativity::Creative,
                    specificity: Specificity::Specific,
                    role: "Email Marketing Specialist",
                },
                &["email", "marketing", "campaign"],
                Difficulty::Intermediate,
                "15-25 minutes",
                &["Re-engagement", "Product promotion", "Newsletters"],
            ),
            template(
                "lesson-plan",
                "Lesson Plan Creator",
                "Build complete lesson plans with activities and assessments",
                "education",
                TemplateForm {
                    goal: "Create a lesson plan for teaching [subject] to [grade level] with objectives, activities, and assessments",
                    audience: "Teachers and educators",
                    context: "The class is 45 minutes long and students have mixed levels of prior knowledge",
                    format: OutputFormat::StepByStep,
                    creativity: Creativity::Balanced,
                    specificity: Specificity::HighlyDetailed,
                    role: "Educator",
                },
                &["education", "teaching", "planning"],
                Difficulty::Intermediate,
                "20-30 minutes",
                &["Classroom teaching", "Curriculum design", "Tutoring"],
            ),
        ];

        Self::new(categories, templates)
    }

    pub fn categories(&self) -> &[TemplateCategory] {
        &self.categories
    }

    pub fn all(&self) -> &[PromptTemplate] {
        &self.templates
    }

    /// Look up a template by id
    pub fn get(&self, id: &str) -> Result<&PromptTemplate> {
        self.templates
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| WizardError::NotFound(format!("Template not found: {}", id)))
    }

    pub fn by_category(&self, category: &str) -> Vec<&PromptTemplate> {
        self.templates.iter().filter(|t| t.category == category).collect()
    }

    pub fn by_difficulty(&self, difficulty: Difficulty) -> Vec<&PromptTemplate> {
        self.templates
            .iter()
            .filter(|t| t.difficulty == difficulty)
            .collect()
    }

    /// Templates whose role contains `role` or is contained in it, ignoring case
    pub fn by_role(&self, role: &str) -> Vec<&PromptTemplate> {
        let role = role.trim().to_lowercase();
        if role.is_empty() {
            return Vec::new();
        }
        self.templates
            .iter()
            .filter(|t| {
                let name = t.role_name();
                name.contains(&role) || role.contains(&name)
            })
            .collect()
    }

    /// Match title, description, tags, and use cases
    pub fn search(&self, query: &str) -> Vec<&PromptTemplate> {
        let query = query.trim().to_lowercase();
        self.templates.iter().filter(|t| t.matches(&query)).collect()
    }

    /// Up to six templates for a role, or from the whole catalog if none match
    pub fn recommended(&self, role: Option<&str>) -> Vec<&PromptTemplate> {
        let mut templates = role.map(|r| self.by_role(r)).unwrap_or_default();
        if templates.is_empty() {
            templates = self.templates.iter().collect();
        }
        templates.truncate(MAX_RECOMMENDATIONS);
        templates
    }
}

struct TemplateForm {
    goal: &'static str,
    audience: &'static str,
    context: &'static str,
    format: OutputFormat,
    creativity: Creativity,
    specificity: Specificity,
    role: &'static str,
}

fn category(id: &str, name: &str, description: &str) -> TemplateCategory {
    TemplateCategory {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn template(
    id: &str,
    title: &str,
    description: &str,
    category: &str,
    form: TemplateForm,
    tags: &[&str],
    difficulty: Difficulty,
    estimated_time: &str,
    use_cases: &[&str],
) -> PromptTemplate {
    PromptTemplate {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        form: Draft {
            goal: form.goal.to_string(),
            role: Role::Known(form.role.to_string()),
            target_audience: form.audience.to_string(),
            context: form.context.to_string(),
            output_format: Some(form.format),
            tags: Default::default(),
            creativity: Some(form.creativity),
            specificity: Some(form.specificity),
        },
        tags: tags.iter().map(|t| t.to_string()).collect(),
        difficulty,
        estimated_time: estimated_time.to_string(),
        use_cases: use_cases.iter().map(|u| u.to_string()).collect(),
    }
}
