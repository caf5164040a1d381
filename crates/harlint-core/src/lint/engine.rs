//! The external linting capability, as seen by this crate.
//!
//! harlint does not implement static analysis itself: it submits source text
//! to whatever engine the host wires in and aggregates the messages that
//! come back. Implementations must tolerate arbitrary, possibly invalid
//! JavaScript; an engine that cannot handle a snippet reports `LintError`
//! and the aggregator degrades that call to zero findings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lint::config::RulesetConfig;

/// One location-specific message returned by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintMessage {
    /// Identifier of the violated rule. `None` marks a generic parse
    /// diagnostic not attributable to a rule; such messages are dropped
    /// during aggregation.
    pub rule_id: Option<String>,
    /// Engine severity level: 1 = warning, 2 = error. Other codes are
    /// carried through aggregation unchanged.
    pub severity: u64,
    pub message: String,
    pub line: u64,
    pub column: u64,
}

#[derive(Debug, Error)]
pub enum LintError {
    /// The engine could not process this particular source text.
    #[error("linter rejected the source text: {0}")]
    Rejected(String),
    /// The engine itself is unavailable or failed internally.
    #[error("linter unavailable: {0}")]
    Unavailable(String),
}

/// Static-analysis capability bound to one rule configuration per call.
///
/// Calls for distinct scripts and rule sets are independent, so the
/// aggregator issues them all at once and gathers the results.
#[async_trait]
pub trait Linter: Send + Sync {
    async fn lint_text(
        &self,
        source: &str,
        config: &RulesetConfig,
    ) -> Result<Vec<LintMessage>, LintError>;
}
