//! Verification checklists.
//!
//! A checklist is a set of verifiable statements extracted from an
//! AI-generated prompt artifact ([`ChecklistParser`]) or synthesized from the
//! prompt's intent when the artifact has none ([`BasicChecklistGenerator`]).

mod generator;
mod parser;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use generator::{BasicChecklistGenerator, PromptIntent};
pub use parser::{detect_verification_type, ChecklistParser};

/// Which section of a checklist an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemCategory {
    Validation,
    EdgeCase,
    Risk,
}

impl ItemCategory {
    /// Label used in item ids and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::EdgeCase => "edge-case",
            Self::Risk => "risk",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an item can be confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerificationType {
    /// Machine-checkable through a verification hook
    Automated,

    /// Needs a human glance at tool output (rendering, console noise)
    SemiAutomated,

    /// Requires human judgment
    Manual,
}

impl VerificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Automated => "automated",
            Self::SemiAutomated => "semi-automated",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for VerificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One verifiable statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Identifier, unique within one checklist
    pub id: String,

    /// Section the item came from
    pub category: ItemCategory,

    /// Statement text
    pub content: String,

    /// Free-text group label (e.g. "Functionality")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// How the item can be confirmed
    pub verification_type: VerificationType,
}

impl ChecklistItem {
    /// Create an item without a group.
    pub fn new(
        id: impl Into<String>,
        category: ItemCategory,
        content: impl Into<String>,
        verification_type: VerificationType,
    ) -> Self {
        Self { id: id.into(), category, content: content.into(), group: None, verification_type }
    }

    /// Set the group label.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

/// A structured checklist.
///
/// `total_items` always equals the combined length of the three item lists;
/// build values through [`ParsedChecklist::new`] to keep it that way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedChecklist {
    /// Validation items, in document order
    pub validation_items: Vec<ChecklistItem>,

    /// Edge cases, in document order
    pub edge_cases: Vec<ChecklistItem>,

    /// Risks, in document order
    pub risks: Vec<ChecklistItem>,

    /// Whether the checklist carries anything to verify
    pub has_checklist: bool,

    /// Number of items across all three lists
    pub total_items: usize,
}

impl ParsedChecklist {
    /// Build a checklist; `has_checklist` is true when any item is present.
    pub fn new(
        validation_items: Vec<ChecklistItem>,
        edge_cases: Vec<ChecklistItem>,
        risks: Vec<ChecklistItem>,
    ) -> Self {
        let total_items = validation_items.len() + edge_cases.len() + risks.len();
        Self { validation_items, edge_cases, risks, has_checklist: total_items > 0, total_items }
    }

    /// Iterate over every item: validation, then edge cases, then risks.
    pub fn items(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.validation_items.iter().chain(&self.edge_cases).chain(&self.risks)
    }

    /// Items that a verification hook can confirm.
    pub fn automated_items(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.items().filter(|i| i.verification_type == VerificationType::Automated)
    }
}

/// Item counts per category and verification type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChecklistSummary {
    pub validation: usize,
    pub edge_cases: usize,
    pub risks: usize,
    pub automated: usize,
    pub semi_automated: usize,
    pub manual: usize,
}

impl fmt::Display for ChecklistSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "validation={}, edge_cases={}, risks={} (automated={}, semi_automated={}, manual={})",
            self.validation,
            self.edge_cases,
            self.risks,
            self.automated,
            self.semi_automated,
            self.manual
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, category: ItemCategory, vt: VerificationType) -> ChecklistItem {
        ChecklistItem::new(id, category, "content", vt)
    }

    #[test]
    fn test_parsed_checklist_totals() {
        let checklist = ParsedChecklist::new(
            vec![item("validation-1", ItemCategory::Validation, VerificationType::Automated)],
            vec![item("edge-case-1", ItemCategory::EdgeCase, VerificationType::Manual)],
            vec![],
        );

        assert!(checklist.has_checklist);
        assert_eq!(checklist.total_items, 2);
        assert_eq!(checklist.items().count(), 2);
        assert_eq!(checklist.automated_items().count(), 1);
    }

    #[test]
    fn test_empty_checklist() {
        let checklist = ParsedChecklist::new(vec![], vec![], vec![]);
        assert!(!checklist.has_checklist);
        assert_eq!(checklist.total_items, 0);
        assert_eq!(checklist, ParsedChecklist::default());
    }

    #[test]
    fn test_item_serialization_uses_kebab_case() {
        let item = ChecklistItem::new(
            "edge-case-1",
            ItemCategory::EdgeCase,
            "Empty input: rejected",
            VerificationType::SemiAutomated,
        )
        .with_group("Empty input");

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["category"], "edge-case");
        assert_eq!(json["verification_type"], "semi-automated");
        assert_eq!(json["group"], "Empty input");
    }

    #[test]
    fn test_ungrouped_item_omits_group() {
        let item = item("risk-1", ItemCategory::Risk, VerificationType::Manual);
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("group"));
    }
}
