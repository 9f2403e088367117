//! Basic checklist generation.
//!
//! Fast-mode prompts carry no checklist of their own. For those, a checklist is
//! built from a per-intent template plus a handful of items triggered by
//! keywords in the prompt text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::VerificationType::{Automated, Manual, SemiAutomated};
use super::{ChecklistItem, ItemCategory, ParsedChecklist, VerificationType};

/// What a prompt is asking the model to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptIntent {
    CodeGeneration,
    Testing,
    Debugging,
    SecurityReview,
    Refinement,
    Planning,
    Documentation,
    Migration,
    Learning,
    PrdGeneration,
    Summarization,
}

impl PromptIntent {
    /// All intents, in declaration order.
    pub const ALL: [Self; 11] = [
        Self::CodeGeneration,
        Self::Testing,
        Self::Debugging,
        Self::SecurityReview,
        Self::Refinement,
        Self::Planning,
        Self::Documentation,
        Self::Migration,
        Self::Learning,
        Self::PrdGeneration,
        Self::Summarization,
    ];

    /// Kebab-case label, e.g. `code-generation`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CodeGeneration => "code-generation",
            Self::Testing => "testing",
            Self::Debugging => "debugging",
            Self::SecurityReview => "security-review",
            Self::Refinement => "refinement",
            Self::Planning => "planning",
            Self::Documentation => "documentation",
            Self::Migration => "migration",
            Self::Learning => "learning",
            Self::PrdGeneration => "prd-generation",
            Self::Summarization => "summarization",
        }
    }

    fn template(self) -> &'static [TemplateItem] {
        match self {
            Self::CodeGeneration => CODE_GENERATION,
            Self::Testing => TESTING,
            Self::Debugging => DEBUGGING,
            Self::SecurityReview => SECURITY_REVIEW,
            Self::Refinement => REFINEMENT,
            Self::Planning => PLANNING,
            Self::Documentation => DOCUMENTATION,
            Self::Migration => MIGRATION,
            Self::Learning => LEARNING,
            Self::PrdGeneration => PRD_GENERATION,
            Self::Summarization => SUMMARIZATION,
        }
    }
}

impl fmt::Display for PromptIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptIntent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|intent| intent.as_str() == label)
            .ok_or_else(|| format!("Unknown intent: {s}"))
    }
}

/// A fixed checklist entry.
#[derive(Debug, Clone, Copy)]
struct TemplateItem {
    content: &'static str,
    group: &'static str,
    verification_type: VerificationType,
}

impl TemplateItem {
    const fn new(
        content: &'static str,
        group: &'static str,
        verification_type: VerificationType,
    ) -> Self {
        Self { content, group, verification_type }
    }

    fn to_item(self, n: usize) -> ChecklistItem {
        ChecklistItem::new(
            format!("generated-{n}"),
            ItemCategory::Validation,
            self.content,
            self.verification_type,
        )
        .with_group(self.group)
    }
}

/// Template for intents without one of their own.
const DEFAULT_TEMPLATE: &[TemplateItem] = &[
    TemplateItem::new("Task is completed successfully", "Functionality", Manual),
    TemplateItem::new("No errors or warnings", "Quality", SemiAutomated),
    TemplateItem::new("Output meets requirements", "Functionality", Manual),
];

// Per-intent templates

const CODE_GENERATION: &[TemplateItem] = &[
    TemplateItem::new("Code compiles/runs without errors", "Functionality", Automated),
    TemplateItem::new("All requirements from prompt are implemented", "Functionality", Manual),
    TemplateItem::new("No console errors or warnings", "Quality", SemiAutomated),
    TemplateItem::new("Code follows project conventions", "Quality", Automated),
];

const TESTING: &[TemplateItem] = &[
    TemplateItem::new("All tests pass", "Functionality", Automated),
    TemplateItem::new("Test coverage is acceptable", "Coverage", Automated),
    TemplateItem::new("Edge cases are tested", "Coverage", Manual),
    TemplateItem::new("Tests are independent (no shared state)", "Quality", Manual),
];

const DEBUGGING: &[TemplateItem] = &[
    TemplateItem::new("Bug is fixed", "Functionality", Manual),
    TemplateItem::new("No regression introduced", "Regression", Automated),
    TemplateItem::new("Root cause is addressed", "Analysis", Manual),
    TemplateItem::new("Related areas tested for side effects", "Regression", Manual),
];

const SECURITY_REVIEW: &[TemplateItem] = &[
    TemplateItem::new("Authentication is verified", "Auth", Manual),
    TemplateItem::new("Input is properly sanitized", "Input", Manual),
    TemplateItem::new("Sensitive data is protected", "Data", Manual),
    TemplateItem::new("No known vulnerabilities", "Security", Manual),
];

const REFINEMENT: &[TemplateItem] = &[
    TemplateItem::new("Improvement is implemented", "Functionality", Manual),
    TemplateItem::new("No functionality regression", "Regression", Automated),
    TemplateItem::new("Performance is not degraded", "Performance", Manual),
    TemplateItem::new("Code quality is maintained", "Quality", Automated),
];

const PLANNING: &[TemplateItem] = &[
    TemplateItem::new("Plan is clear and actionable", "Clarity", Manual),
    TemplateItem::new("All requirements are addressed", "Completeness", Manual),
    TemplateItem::new("Risks are identified", "Risk", Manual),
];

const DOCUMENTATION: &[TemplateItem] = &[
    TemplateItem::new("Documentation is accurate", "Accuracy", Manual),
    TemplateItem::new("Examples are correct and work", "Accuracy", Manual),
    TemplateItem::new("Documentation is complete", "Completeness", Manual),
];

const MIGRATION: &[TemplateItem] = &[
    TemplateItem::new("Migration completes successfully", "Functionality", Manual),
    TemplateItem::new("Data integrity is preserved", "Data", Manual),
    TemplateItem::new("All features work post-migration", "Functionality", Manual),
    TemplateItem::new("Rollback plan is tested", "Safety", Manual),
];

const LEARNING: &[TemplateItem] = &[
    TemplateItem::new("Concept is understood", "Understanding", Manual),
    TemplateItem::new("Examples are working", "Practice", Manual),
];

const PRD_GENERATION: &[TemplateItem] = &[
    TemplateItem::new("PRD covers all requirements", "Completeness", Manual),
    TemplateItem::new("Success criteria are defined", "Clarity", Manual),
];

const SUMMARIZATION: &[TemplateItem] = &[
    TemplateItem::new("Summary captures key points", "Accuracy", Manual),
    TemplateItem::new("No important details omitted", "Completeness", Manual),
];

/// Keyword clusters checked against the prompt. Each cluster that matches adds
/// its item once; clusters are independent of each other.
const KEYWORD_CLUSTERS: &[(&[&str], TemplateItem)] = &[
    (
        &["api", "endpoint", "route", "rest", "graphql"],
        TemplateItem::new("API endpoints return correct responses", "API", Manual),
    ),
    (
        &["ui", "component", "form", "page", "button"],
        TemplateItem::new("UI renders correctly", "UI", SemiAutomated),
    ),
    (
        &["database", "db", "query", "schema", "migration"],
        TemplateItem::new("Database operations work correctly", "Data", Manual),
    ),
    (
        &["auth", "login", "session", "token", "permission"],
        TemplateItem::new(
            "Authentication/authorization works correctly",
            "Security",
            Manual,
        ),
    ),
    (
        &["performance", "optimize", "speed", "fast", "slow"],
        TemplateItem::new("Performance is acceptable", "Performance", Manual),
    ),
];

/// Fallback checklist generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicChecklistGenerator;

impl BasicChecklistGenerator {
    /// Create a new generator.
    pub fn new() -> Self {
        Self
    }

    /// Generate the template checklist for an intent label.
    ///
    /// Unrecognized labels get a generic three-item checklist.
    pub fn generate(&self, intent: &str) -> ParsedChecklist {
        let items = template_for(intent)
            .iter()
            .enumerate()
            .map(|(i, template)| template.to_item(i + 1))
            .collect();

        ParsedChecklist::new(items, Vec::new(), Vec::new())
    }

    /// Generate a checklist for a prompt, adding items for the topics it mentions.
    pub fn generate_from_prompt(&self, content: &str, intent: &str) -> ParsedChecklist {
        let mut checklist = self.generate(intent);
        let lower = content.to_lowercase();

        for (keywords, template) in KEYWORD_CLUSTERS {
            if keywords.iter().any(|kw| lower.contains(kw)) {
                let n = checklist.validation_items.len() + 1;
                checklist.validation_items.push(template.to_item(n));
            }
        }

        tracing::debug!(
            intent,
            items = checklist.validation_items.len(),
            "Generated fallback checklist"
        );

        checklist.total_items = checklist.validation_items.len();
        checklist.has_checklist = true;
        checklist
    }

    /// Intents that have a dedicated template.
    pub fn available_intents(&self) -> Vec<PromptIntent> {
        PromptIntent::ALL.to_vec()
    }

    /// Check whether an intent label has a dedicated template.
    pub fn has_checklist_for_intent(&self, intent: &str) -> bool {
        intent.parse::<PromptIntent>().is_ok()
    }
}

fn template_for(intent: &str) -> &'static [TemplateItem] {
    intent.parse::<PromptIntent>().map_or(DEFAULT_TEMPLATE, PromptIntent::template)
}
