//! Reference linter backing the binary.
//!
//! A pattern-based stand-in for a full JavaScript engine: it recognizes a
//! fixed set of dangerous constructs with regular expressions and reports
//! them under the matching rule names, honoring whichever rule table each
//! call is bound to. Hosts with a real engine implement `Linter` themselves
//! and never touch this module.

use async_trait::async_trait;
use regex::Regex;

use harlint_core::lint::{LintError, LintMessage, Linter, RuleLevel, RulesetConfig};

struct PatternCheck {
    rule: &'static str,
    pattern: Regex,
    message: &'static str,
}

pub struct PatternLinter {
    checks: Vec<PatternCheck>,
}

impl PatternLinter {
    pub fn new() -> anyhow::Result<Self> {
        let table: [(&'static str, &'static str, &'static str); 7] = [
            (
                "no-eval",
                r"\beval\s*\(",
                "eval can be harmful.",
            ),
            (
                "no-implied-eval",
                r#"\b(?:setTimeout|setInterval)\s*\(\s*["']"#,
                "Implied eval. Consider passing a function instead of a string.",
            ),
            (
                "no-new-func",
                r"\bnew\s+Function\s*\(",
                "The Function constructor is eval.",
            ),
            (
                "no-script-url",
                r#"["']javascript:"#,
                "Script URL is a form of eval.",
            ),
            (
                "no-with",
                r"\bwith\s*\(",
                "Unexpected use of 'with' statement.",
            ),
            (
                "no-debugger",
                r"\bdebugger\b",
                "Unexpected 'debugger' statement.",
            ),
            (
                "no-console",
                r"\bconsole\.\w+\s*\(",
                "Unexpected console statement.",
            ),
        ];

        let mut checks = Vec::with_capacity(table.len());
        for (rule, pattern, message) in table {
            checks.push(PatternCheck {
                rule,
                pattern: Regex::new(pattern)?,
                message,
            });
        }
        Ok(Self { checks })
    }
}

#[async_trait]
impl Linter for PatternLinter {
    async fn lint_text(
        &self,
        source: &str,
        config: &RulesetConfig,
    ) -> Result<Vec<LintMessage>, LintError> {
        let mut messages = Vec::new();
        for check in &self.checks {
            let Some(state) = config.rules.get(check.rule) else {
                continue;
            };
            let severity = match state.level {
                RuleLevel::Off => continue,
                RuleLevel::Warn => 1,
                RuleLevel::Error => 2,
            };
            for (line_no, line) in source.lines().enumerate() {
                for found in check.pattern.find_iter(line) {
                    messages.push(LintMessage {
                        rule_id: Some(check.rule.to_string()),
                        severity,
                        message: check.message.to_string(),
                        line: line_no as u64 + 1,
                        column: found.start() as u64 + 1,
                    });
                }
            }
        }
        Ok(messages)
    }
}
