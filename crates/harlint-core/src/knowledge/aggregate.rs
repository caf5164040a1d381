//! Folds raw linter output into a rule-indexed knowledge report.
//!
//! Every script in the inventory is submitted to the engine once per rule
//! set. The 2×N calls are independent and issued together; aggregation is a
//! pure fold that runs only after every call has settled. A failed call
//! degrades to zero findings and is recorded on the report, so a total
//! engine outage still yields a well-formed, all-resolved report.

use futures::future;

use crate::extract::model::{ScriptInventory, ScriptRecord};
use crate::knowledge::model::{DegradedLint, Finding, IssueMap, KnowledgeReport, RuleEntry, Severity};
use crate::lint::{Linter, Ruleset};

/// Aggregate one capture's inventory into a knowledge report.
///
/// An absent inventory is a valid, reportable state: the result carries an
/// empty issue mapping. An inventory without scripts still enumerates the
/// enabled-rule universe, with every entry resolved.
pub async fn aggregate<L: Linter>(
    inventory: Option<&ScriptInventory>,
    url: &str,
    group: &str,
    rulesets: &[Ruleset],
    linter: &L,
) -> KnowledgeReport {
    let mut report = KnowledgeReport::empty(url, group);

    let Some(inventory) = inventory else {
        return report;
    };

    // Scatter: one call per script per rule set. Gathering keeps submission
    // order, which fixes sub-issue ordering per rule.
    let mut calls = Vec::with_capacity(inventory.all_scripts.len() * rulesets.len());
    for script in &inventory.all_scripts {
        for ruleset in rulesets {
            calls.push(lint_script(script, ruleset, linter));
        }
    }
    let outcomes = future::join_all(calls).await;

    for outcome in outcomes {
        match outcome {
            LintOutcome::Findings(findings) => {
                for finding in findings {
                    record_finding(&mut report.issues, finding);
                }
            }
            LintOutcome::Degraded(degraded) => {
                tracing::warn!(
                    url = %degraded.url,
                    category = %degraded.category,
                    cause = %degraded.cause,
                    "lint call degraded to zero findings"
                );
                report.degraded.push(degraded);
            }
        }
    }

    resolve_quiet_rules(&mut report.issues, rulesets);
    report
}

enum LintOutcome {
    Findings(Vec<Finding>),
    Degraded(DegradedLint),
}

async fn lint_script<L: Linter>(
    script: &ScriptRecord,
    ruleset: &Ruleset,
    linter: &L,
) -> LintOutcome {
    match linter.lint_text(&script.content, &ruleset.config).await {
        Ok(messages) => LintOutcome::Findings(
            messages
                .into_iter()
                .filter_map(|message| {
                    // Messages without a rule identifier are generic parse
                    // diagnostics; they never become rule entries.
                    let rule = message.rule_id?;
                    Some(Finding {
                        url: script.url.clone(),
                        rule,
                        category: ruleset.category,
                        severity: Severity::from_level(message.severity),
                        text: message.message,
                        line: message.line,
                        column: message.column,
                    })
                })
                .collect(),
        ),
        Err(err) => LintOutcome::Degraded(DegradedLint {
            url: script.url.clone(),
            category: ruleset.category,
            cause: err.to_string(),
        }),
    }
}

/// Group a finding under its rule entry, creating the entry on first sight.
/// The first finding fixes the entry's severity and category.
fn record_finding(issues: &mut IssueMap, finding: Finding) {
    let entry = issues.or_insert_with(&finding.rule, || RuleEntry {
        rule: finding.rule.clone(),
        category: finding.category,
        severity: finding.severity.clone(),
        sub_issues: Vec::new(),
    });
    entry.sub_issues.push(finding);
}

/// Synthesize a resolved entry for every enabled rule that never fired.
/// Rule sets are consulted in order, so a rule configured in both resolves
/// under the earlier (security) category.
fn resolve_quiet_rules(issues: &mut IssueMap, rulesets: &[Ruleset]) {
    for ruleset in rulesets {
        for rule in ruleset.config.enabled_rules() {
            if issues.contains_key(rule) {
                continue;
            }
            issues.insert(rule, RuleEntry::resolved(rule, ruleset.category));
        }
    }
}
