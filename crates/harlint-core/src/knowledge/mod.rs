pub mod aggregate;
pub mod model;
pub mod render;

pub use aggregate::aggregate;
pub use model::{DegradedLint, Finding, IssueMap, KnowledgeReport, RuleEntry, Severity};
