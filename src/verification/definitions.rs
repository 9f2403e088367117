//! Built-in hook definitions and output classification.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use super::HookKind;

/// A compiled output pattern that remembers its source text.
#[derive(Debug)]
pub struct Pattern {
    source: &'static str,
    regex: Regex,
}

impl Pattern {
    fn new(source: &'static str, case_insensitive: bool) -> Self {
        let regex = RegexBuilder::new(source)
            .case_insensitive(case_insensitive)
            .build()
            .expect("valid regex");
        Self { source, regex }
    }

    /// Pattern source as written, without flags.
    pub fn source(&self) -> &'static str {
        self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Per-kind display name, reference commands and output patterns.
#[derive(Debug)]
pub struct HookDefinition {
    pub kind: HookKind,
    pub display_name: &'static str,

    /// Commands this kind is typically run with
    pub commands: &'static [&'static str],

    success_patterns: Vec<Pattern>,
    failure_patterns: Vec<Pattern>,
}

impl HookDefinition {
    pub fn success_patterns(&self) -> &[Pattern] {
        &self.success_patterns
    }

    pub fn failure_patterns(&self) -> &[Pattern] {
        &self.failure_patterns
    }

    /// Check the output against the failure patterns, in order.
    ///
    /// A match whose first capture group is exactly `0` ("0 errors") does not
    /// count as a failure; the matched span is blanked out so later, looser
    /// patterns such as `error` cannot trip over it.
    pub fn output_indicates_failure(&self, output: &str) -> bool {
        let mut text = Cow::Borrowed(output);

        for pattern in &self.failure_patterns {
            while let Some(caps) = pattern.regex.captures(&text) {
                if caps.get(1).map(|m| m.as_str()) != Some("0") {
                    return true;
                }

                let span = caps.get(0).map_or(0..0, |m| m.range());
                let masked = format!("{} {}", &text[..span.start], &text[span.end..]);
                text = Cow::Owned(masked);
            }
        }

        false
    }

    /// Check whether any success pattern matches the output.
    pub fn output_indicates_success(&self, output: &str) -> bool {
        self.success_patterns.iter().any(|p| p.is_match(output))
    }

    /// Check whether any failure pattern matches the output, zero counts included.
    pub fn output_mentions_failure(&self, output: &str) -> bool {
        self.failure_patterns.iter().any(|p| p.is_match(output))
    }
}

fn patterns(specs: &[(&'static str, bool)]) -> Vec<Pattern> {
    specs.iter().map(|&(source, ci)| Pattern::new(source, ci)).collect()
}

static TEST: Lazy<HookDefinition> = Lazy::new(|| HookDefinition {
    kind: HookKind::Test,
    display_name: "Tests",
    commands: &["npm test", "npm run test", "yarn test", "pnpm test"],
    success_patterns: patterns(&[
        (r"(\d+)\s+(passing|passed)", true),
        (r"tests?\s+passed", true),
        (r"all\s+tests?\s+passed", true),
        (r"0\s+failed", true),
        (r"test\s+suites?:\s+\d+\s+passed", true),
    ]),
    failure_patterns: patterns(&[
        (r"(\d+)\s+failed", true),
        (r"test\s+failed", true),
        (r"FAIL", true),
        (r"error", true),
    ]),
});

static BUILD: Lazy<HookDefinition> = Lazy::new(|| HookDefinition {
    kind: HookKind::Build,
    display_name: "Build",
    commands: &["npm run build", "yarn build", "pnpm build", "tsc"],
    success_patterns: patterns(&[
        (r"successfully", true),
        (r"done", true),
        (r"built", true),
        (r"compiled", true),
    ]),
    failure_patterns: patterns(&[(r"error", true), (r"failed", true), (r"TS\d{4}:", false)]),
});

static LINT: Lazy<HookDefinition> = Lazy::new(|| HookDefinition {
    kind: HookKind::Lint,
    display_name: "Lint",
    commands: &["npm run lint", "yarn lint", "pnpm lint", "eslint ."],
    success_patterns: patterns(&[
        (r"0\s+errors?", true),
        (r"no\s+errors?", true),
        (r"all\s+files?\s+pass", true),
    ]),
    failure_patterns: patterns(&[(r"(\d+)\s+errors?", true), (r"error", true)]),
});

static TYPECHECK: Lazy<HookDefinition> = Lazy::new(|| HookDefinition {
    kind: HookKind::Typecheck,
    display_name: "Type Check",
    commands: &["tsc --noEmit", "npm run typecheck", "yarn typecheck"],
    // tsc prints nothing on success
    success_patterns: patterns(&[(r"^$", false)]),
    failure_patterns: patterns(&[(r"error\s+TS\d{4}", true), (r"Type\s+error", true)]),
});

static CUSTOM: Lazy<HookDefinition> = Lazy::new(|| HookDefinition {
    kind: HookKind::Custom,
    display_name: "Custom",
    commands: &[],
    success_patterns: Vec::new(),
    failure_patterns: Vec::new(),
});

/// Look up the built-in definition for a hook kind.
pub fn definition(kind: HookKind) -> &'static HookDefinition {
    match kind {
        HookKind::Test => &TEST,
        HookKind::Build => &BUILD,
        HookKind::Lint => &LINT,
        HookKind::Typecheck => &TYPECHECK,
        HookKind::Custom => &CUSTOM,
    }
}
