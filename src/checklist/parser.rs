//! Checklist parser.
//!
//! Extracts the "Validation Checklist", "Edge Cases to Consider" and
//! "What Could Go Wrong" sections from prompt artifacts. The input is
//! semi-structured markdown written by a model, so every rule here is
//! forgiving: a missing or malformed section yields no items, never an error.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{
    ChecklistItem, ChecklistSummary, ItemCategory, ParsedChecklist, VerificationType,
};

static VALIDATION_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^#{2,3}\s*Validation\s+Checklist").expect("valid regex"));

static EDGE_CASE_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^#{2,3}\s*Edge\s+Cases?\s+to\s+Consider").expect("valid regex")
});

static RISK_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^#{2,3}\s*What\s+Could\s+Go\s+Wrong").expect("valid regex"));

/// `**Label:**` sets the group for the validation items that follow.
static GROUP_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?):\*\*").expect("valid regex"));

/// A unicode checkbox glyph or a markdown `- [ ]` followed by the item text.
static CHECKBOX_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[☐□○●◯]|-\s*\[\s*\])\s*(.+)$").expect("valid regex"));

/// `• **Label**: detail`, colon optional. Edge cases need the detail.
static EDGE_CASE_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[•\-*]\s*\*\*(.+?)\*\*:?\s*(.+)$").expect("valid regex"));

/// Same as [`EDGE_CASE_BULLET`], but a risk may be a bare label.
static RISK_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[•\-*]\s*\*\*(.+?)\*\*:?\s*(.*)$").expect("valid regex"));

/// Bullet with plain text and no bold markup.
static PLAIN_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[•\-*]\s+([^*]+)$").expect("valid regex"));

/// Keyword tables for [`detect_verification_type`], evaluated top to bottom.
/// Order matters: the first phrase found decides the type.
const VERIFICATION_KEYWORDS: &[(VerificationType, &[&str])] = &[
    (
        VerificationType::Automated,
        &[
            "compiles",
            "builds",
            "tests pass",
            "all tests",
            "test coverage",
            "lint",
            "typecheck",
            "no errors",
            "exit code",
            "npm test",
            "npm run",
            "build succeeds",
            "build passes",
        ],
    ),
    (
        VerificationType::SemiAutomated,
        &[
            "renders",
            "displays",
            "console errors",
            "console warnings",
            "no warnings",
            "ui renders",
            "responsive",
            "screen sizes",
            "visual",
            "layout",
        ],
    ),
];

/// Classify an item by the keywords it mentions. Defaults to manual.
pub fn detect_verification_type(content: &str) -> VerificationType {
    let lower = content.to_lowercase();

    VERIFICATION_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map_or(VerificationType::Manual, |(vt, _)| *vt)
}

/// Parser for checklist sections of prompt artifacts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChecklistParser;

impl ChecklistParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse all three checklist sections.
    pub fn parse(&self, content: &str) -> ParsedChecklist {
        let checklist = ParsedChecklist::new(
            self.parse_validation_section(content),
            self.parse_edge_case_section(content),
            self.parse_risk_section(content),
        );

        tracing::debug!(
            validation = checklist.validation_items.len(),
            edge_cases = checklist.edge_cases.len(),
            risks = checklist.risks.len(),
            "Parsed checklist"
        );

        checklist
    }

    /// Parse the "Validation Checklist" section.
    pub fn parse_validation_section(&self, content: &str) -> Vec<ChecklistItem> {
        let Some(section) = find_section(content, &VALIDATION_HEADING) else {
            return Vec::new();
        };

        let mut items = Vec::new();
        let mut current_group: Option<String> = None;

        for line in section {
            if let Some(caps) = GROUP_LABEL.captures(line) {
                current_group = Some(caps[1].trim().to_string());
                continue;
            }

            let Some(caps) = CHECKBOX_ITEM.captures(line) else {
                continue;
            };
            let text = caps[1].trim();
            if text.is_empty() {
                continue;
            }

            let mut item = ChecklistItem::new(
                item_id(ItemCategory::Validation, items.len() + 1),
                ItemCategory::Validation,
                text,
                detect_verification_type(text),
            );
            item.group = current_group.clone();
            items.push(item);
        }

        items
    }

    /// Parse the "Edge Cases to Consider" section.
    pub fn parse_edge_case_section(&self, content: &str) -> Vec<ChecklistItem> {
        find_section(content, &EDGE_CASE_HEADING)
            .map(|section| {
                parse_bulleted_items(&section, ItemCategory::EdgeCase, &EDGE_CASE_BULLET)
            })
            .unwrap_or_default()
    }

    /// Parse the "What Could Go Wrong" section.
    pub fn parse_risk_section(&self, content: &str) -> Vec<ChecklistItem> {
        find_section(content, &RISK_HEADING)
            .map(|section| parse_bulleted_items(&section, ItemCategory::Risk, &RISK_BULLET))
            .unwrap_or_default()
    }

    /// Classify an item by the keywords it mentions.
    pub fn detect_verification_type(&self, content: &str) -> VerificationType {
        detect_verification_type(content)
    }

    /// Count items per category and per verification type.
    pub fn summary(&self, checklist: &ParsedChecklist) -> ChecklistSummary {
        let mut summary = ChecklistSummary {
            validation: checklist.validation_items.len(),
            edge_cases: checklist.edge_cases.len(),
            risks: checklist.risks.len(),
            ..ChecklistSummary::default()
        };

        for item in checklist.items() {
            match item.verification_type {
                VerificationType::Automated => summary.automated += 1,
                VerificationType::SemiAutomated => summary.semi_automated += 1,
                VerificationType::Manual => summary.manual += 1,
            }
        }

        summary
    }

    /// Check whether any checklist heading is present, whether or not its
    /// section contains parseable items.
    pub fn has_checklist(&self, content: &str) -> bool {
        [&*VALIDATION_HEADING, &*EDGE_CASE_HEADING, &*RISK_HEADING]
            .into_iter()
            .any(|heading| find_section(content, heading).is_some())
    }
}

/// Parse edge-case or risk bullets.
///
/// Bold-labelled bullets are preferred; only when there are none does the
/// section fall back to plain bullets, which carry no group.
fn parse_bulleted_items(
    section: &[&str],
    category: ItemCategory,
    bold_bullet: &Regex,
) -> Vec<ChecklistItem> {
    let mut items: Vec<ChecklistItem> = Vec::new();

    for caps in section.iter().filter_map(|line| bold_bullet.captures(line)) {
        let label = caps[1].trim();
        let detail = caps[2].trim();
        let content =
            if detail.is_empty() { label.to_string() } else { format!("{label}: {detail}") };

        items.push(
            ChecklistItem::new(
                item_id(category, items.len() + 1),
                category,
                content,
                VerificationType::Manual,
            )
            .with_group(label),
        );
    }

    if !items.is_empty() {
        return items;
    }

    for caps in section.iter().filter_map(|line| PLAIN_BULLET.captures(line)) {
        let text = caps[1].trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        items.push(ChecklistItem::new(
            item_id(category, items.len() + 1),
            category,
            text,
            VerificationType::Manual,
        ));
    }

    items
}

/// Lines of the first section whose heading matches `heading`, up to the next
/// level-2/3 heading. Lines are trimmed; the heading line itself is excluded.
fn find_section<'a>(content: &'a str, heading: &Regex) -> Option<Vec<&'a str>> {
    let mut lines = content.lines().map(str::trim);

    lines.by_ref().find(|line| heading.is_match(line))?;

    Some(lines.take_while(|line| !is_section_break(line)).collect())
}

/// A level-2 or level-3 markdown heading.
fn is_section_break(line: &str) -> bool {
    let level = line.chars().take_while(|&c| c == '#').count();
    (2..=3).contains(&level)
}

fn item_id(category: ItemCategory, n: usize) -> String {
    format!("{}-{n}", category.as_str())
}
