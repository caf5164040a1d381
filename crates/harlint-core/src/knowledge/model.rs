use std::fmt;

use serde::de::{Deserializer, Error as DeError, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::lint::RuleCategory;
use crate::util::OrderedMap;

/// Severity attached to a finding or rule entry.
///
/// Engine levels 1 and 2 normalize to `Warning` and `Error`; any other code
/// is carried through unchanged as `Code`. `Resolved` is synthesized for
/// enabled rules that produced no findings and never comes from the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
    Resolved,
    /// Unrecognized engine severity code, passed through as-is.
    Code(u64),
}

impl Severity {
    pub fn from_level(level: u64) -> Self {
        match level {
            1 => Severity::Warning,
            2 => Severity::Error,
            other => Severity::Code(other),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
            Severity::Resolved => f.write_str("resolved"),
            Severity::Code(code) => write!(f, "{code}"),
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Severity::Warning => serializer.serialize_str("warning"),
            Severity::Error => serializer.serialize_str("error"),
            Severity::Resolved => serializer.serialize_str("resolved"),
            Severity::Code(code) => serializer.serialize_u64(*code),
        }
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SeverityVisitor;

        impl Visitor<'_> for SeverityVisitor {
            type Value = Severity;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("\"warning\", \"error\", \"resolved\" or a numeric severity code")
            }

            fn visit_str<E: DeError>(self, value: &str) -> Result<Self::Value, E> {
                match value {
                    "warning" => Ok(Severity::Warning),
                    "error" => Ok(Severity::Error),
                    "resolved" => Ok(Severity::Resolved),
                    other => Err(E::custom(format!("unknown severity: {other:?}"))),
                }
            }

            fn visit_u64<E: DeError>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Severity::from_level(value))
            }

            fn visit_i64<E: DeError>(self, value: i64) -> Result<Self::Value, E> {
                u64::try_from(value)
                    .map_err(|_| E::custom(format!("negative severity code: {value}")))
                    .map(Severity::from_level)
            }
        }

        deserializer.deserialize_any(SeverityVisitor)
    }
}

/// One reported violation of one rule at one source location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// URL of the response the offending script came from.
    pub url: String,
    pub rule: String,
    pub category: RuleCategory,
    pub severity: Severity,
    pub text: String,
    pub line: u64,
    pub column: u64,
}

/// All knowledge about one rule within one report: either the findings that
/// named it, or a synthesized "resolved" marker when an enabled rule stayed
/// quiet. Severity and category come from the first-seen finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEntry {
    pub rule: String,
    pub category: RuleCategory,
    pub severity: Severity,
    pub sub_issues: Vec<Finding>,
}

impl RuleEntry {
    /// Entry for an enabled rule that produced no findings.
    pub fn resolved(rule: impl Into<String>, category: RuleCategory) -> Self {
        Self {
            rule: rule.into(),
            category,
            severity: Severity::Resolved,
            sub_issues: Vec::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.severity == Severity::Resolved
    }
}

/// Rule-name-indexed issue mapping, iterated in insertion order.
pub type IssueMap = OrderedMap<RuleEntry>;

/// A lint call that failed and degraded to zero findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradedLint {
    pub url: String,
    pub category: RuleCategory,
    pub cause: String,
}

/// Aggregated analysis knowledge for one capture event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeReport {
    pub url: String,
    pub group: String,
    pub issues: IssueMap,
    /// Lint calls that failed; kept so degradation is observable without
    /// failing the report.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded: Vec<DegradedLint>,
}

impl KnowledgeReport {
    pub fn empty(url: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            group: group.into(),
            issues: IssueMap::new(),
            degraded: Vec::new(),
        }
    }
}
