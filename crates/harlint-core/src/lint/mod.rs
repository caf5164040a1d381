pub mod config;
pub mod engine;

pub use config::{ConfigError, RuleCategory, RuleLevel, RuleState, Ruleset, RulesetConfig};
pub use engine::{LintError, LintMessage, Linter};
