//! Rule-set descriptors and their configuration shape.
//!
//! A rule set is a named bundle of rule-to-severity settings. The external
//! configuration format is a "flat config" JSON array whose first element
//! carries a `rules` mapping; a rule's descriptor is either the disabled
//! sentinel (`"off"` / `0`) or an enabled level, plain (`"error"`, `2`) or
//! option-carrying (`["error", {...}]`). Option payloads are opaque here:
//! only enablement matters to aggregation.

use std::fmt;

use serde::de::{Deserializer, Error as DeError, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::OrderedMap;

/// Which of the two analysis dimensions a rule set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    Security,
    Standard,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Security => f.write_str("security"),
            RuleCategory::Standard => f.write_str("standard"),
        }
    }
}

/// Configured reporting level of one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleLevel {
    Off,
    Warn,
    Error,
}

impl RuleLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleLevel::Off => "off",
            RuleLevel::Warn => "warn",
            RuleLevel::Error => "error",
        }
    }
}

impl fmt::Display for RuleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RuleLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RuleLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LevelVisitor;

        impl Visitor<'_> for LevelVisitor {
            type Value = RuleLevel;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("\"off\", \"warn\", \"error\", 0, 1 or 2")
            }

            fn visit_str<E: DeError>(self, value: &str) -> Result<Self::Value, E> {
                match value {
                    "off" => Ok(RuleLevel::Off),
                    "warn" => Ok(RuleLevel::Warn),
                    "error" => Ok(RuleLevel::Error),
                    other => Err(E::custom(format!("unknown rule level: {other:?}"))),
                }
            }

            fn visit_u64<E: DeError>(self, value: u64) -> Result<Self::Value, E> {
                match value {
                    0 => Ok(RuleLevel::Off),
                    1 => Ok(RuleLevel::Warn),
                    2 => Ok(RuleLevel::Error),
                    other => Err(E::custom(format!("unknown rule level code: {other}"))),
                }
            }

            fn visit_i64<E: DeError>(self, value: i64) -> Result<Self::Value, E> {
                u64::try_from(value)
                    .map_err(|_| E::custom(format!("unknown rule level code: {value}")))
                    .and_then(|v| self.visit_u64(v))
            }
        }

        deserializer.deserialize_any(LevelVisitor)
    }
}

/// One rule's configured state: a level plus any option payload from the
/// option-carrying descriptor form.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleState {
    pub level: RuleLevel,
    pub options: Vec<serde_json::Value>,
}

impl RuleState {
    pub fn off() -> Self {
        Self {
            level: RuleLevel::Off,
            options: Vec::new(),
        }
    }

    pub fn warn() -> Self {
        Self {
            level: RuleLevel::Warn,
            options: Vec::new(),
        }
    }

    pub fn error() -> Self {
        Self {
            level: RuleLevel::Error,
            options: Vec::new(),
        }
    }

    /// Whether the rule participates in the enabled-rule universe.
    pub fn is_enabled(&self) -> bool {
        self.level != RuleLevel::Off
    }
}

impl Serialize for RuleState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.options.is_empty() {
            self.level.serialize(serializer)
        } else {
            let mut seq = serializer.serialize_seq(Some(1 + self.options.len()))?;
            seq.serialize_element(&self.level)?;
            for option in &self.options {
                seq.serialize_element(option)?;
            }
            seq.end()
        }
    }
}

impl<'de> Deserialize<'de> for RuleState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StateVisitor;

        impl<'de> Visitor<'de> for StateVisitor {
            type Value = RuleState;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a rule level or an option-carrying [level, ...] array")
            }

            fn visit_str<E: DeError>(self, value: &str) -> Result<Self::Value, E> {
                let level = match value {
                    "off" => RuleLevel::Off,
                    "warn" => RuleLevel::Warn,
                    "error" => RuleLevel::Error,
                    other => return Err(E::custom(format!("unknown rule level: {other:?}"))),
                };
                Ok(RuleState {
                    level,
                    options: Vec::new(),
                })
            }

            fn visit_u64<E: DeError>(self, value: u64) -> Result<Self::Value, E> {
                let level = match value {
                    0 => RuleLevel::Off,
                    1 => RuleLevel::Warn,
                    2 => RuleLevel::Error,
                    other => return Err(E::custom(format!("unknown rule level code: {other}"))),
                };
                Ok(RuleState {
                    level,
                    options: Vec::new(),
                })
            }

            fn visit_i64<E: DeError>(self, value: i64) -> Result<Self::Value, E> {
                u64::try_from(value)
                    .map_err(|_| E::custom(format!("unknown rule level code: {value}")))
                    .and_then(|v| self.visit_u64(v))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let level: RuleLevel = seq
                    .next_element()?
                    .ok_or_else(|| A::Error::custom("empty rule descriptor"))?;
                let mut options = Vec::new();
                while let Some(option) = seq.next_element::<serde_json::Value>()? {
                    options.push(option);
                }
                Ok(RuleState { level, options })
            }
        }

        deserializer.deserialize_any(StateVisitor)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("flat configuration contains no entries")]
    Empty,
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The rule table of one configuration, in document order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesetConfig {
    #[serde(default)]
    pub rules: OrderedMap<RuleState>,
}

impl RulesetConfig {
    /// Parse the external flat-config shape: an array whose first element
    /// carries the `rules` mapping. Other entries and fields are ignored.
    pub fn from_flat_config(json: &str) -> Result<Self, ConfigError> {
        let entries: Vec<RulesetConfig> = serde_json::from_str(json)?;
        entries.into_iter().next().ok_or(ConfigError::Empty)
    }

    pub fn with_rule(mut self, name: &str, state: RuleState) -> Self {
        self.rules.insert(name, state);
        self
    }

    pub fn is_enabled(&self, rule: &str) -> bool {
        self.rules.get(rule).is_some_and(RuleState::is_enabled)
    }

    /// Configured rules whose state is not the disabled sentinel,
    /// in configuration order.
    pub fn enabled_rules(&self) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .filter(|(_, state)| state.is_enabled())
            .map(|(name, _)| name)
    }
}

/// A rule-set descriptor: the category name plus its configuration.
/// Aggregation takes a slice of these, so the security and standard passes
/// share one code path.
#[derive(Debug, Clone)]
pub struct Ruleset {
    pub category: RuleCategory,
    pub config: RulesetConfig,
}

impl Ruleset {
    pub fn new(category: RuleCategory, config: RulesetConfig) -> Self {
        Self { category, config }
    }

    /// Built-in security rule table.
    pub fn security() -> Self {
        let config = RulesetConfig::default()
            .with_rule("no-eval", RuleState::error())
            .with_rule("no-implied-eval", RuleState::error())
            .with_rule("no-new-func", RuleState::off())
            .with_rule("no-script-url", RuleState::error())
            .with_rule("no-unsafe-finally", RuleState::off())
            .with_rule("no-unsafe-negation", RuleState::off())
            .with_rule("no-prototype-builtins", RuleState::off())
            .with_rule("no-with", RuleState::off())
            .with_rule("require-await", RuleState::off())
            .with_rule("eqeqeq", RuleState::off());
        Self::new(RuleCategory::Security, config)
    }

    /// Built-in standard quality rule table.
    pub fn standard() -> Self {
        let config = RulesetConfig::default()
            .with_rule("no-console", RuleState::off())
            .with_rule("no-debugger", RuleState::error())
            .with_rule("no-unreachable", RuleState::off())
            .with_rule("no-undef", RuleState::off())
            .with_rule("no-unmodified-loop-condition", RuleState::off())
            .with_rule("no-useless-concat", RuleState::off())
            .with_rule("no-useless-escape", RuleState::off())
            .with_rule("no-unused-vars", RuleState::off())
            .with_rule("semi", RuleState::off())
            .with_rule("quotes", RuleState::off())
            .with_rule("indent", RuleState::off())
            .with_rule("comma-dangle", RuleState::off())
            .with_rule("space-before-function-paren", RuleState::off());
        Self::new(RuleCategory::Standard, config)
    }

    /// The default pair of rule sets, in aggregation order.
    pub fn defaults() -> Vec<Ruleset> {
        vec![Self::security(), Self::standard()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_string_descriptors_parse() {
        let config: RulesetConfig = serde_json::from_value(json!({
            "rules": { "no-eval": "error", "semi": "warn", "quotes": "off" }
        }))
        .unwrap();

        assert_eq!(config.rules.get("no-eval").unwrap().level, RuleLevel::Error);
        assert_eq!(config.rules.get("semi").unwrap().level, RuleLevel::Warn);
        assert!(!config.is_enabled("quotes"));
    }

    #[test]
    fn numeric_descriptors_parse() {
        let config: RulesetConfig = serde_json::from_value(json!({
            "rules": { "a": 0, "b": 1, "c": 2 }
        }))
        .unwrap();

        assert_eq!(config.rules.get("a").unwrap().level, RuleLevel::Off);
        assert_eq!(config.rules.get("b").unwrap().level, RuleLevel::Warn);
        assert_eq!(config.rules.get("c").unwrap().level, RuleLevel::Error);
    }

    #[test]
    fn option_carrying_descriptors_parse() {
        let config: RulesetConfig = serde_json::from_value(json!({
            "rules": { "quotes": ["error", "single", { "avoidEscape": true }] }
        }))
        .unwrap();

        let state = config.rules.get("quotes").unwrap();
        assert_eq!(state.level, RuleLevel::Error);
        assert_eq!(state.options.len(), 2);
        assert!(state.is_enabled());
    }

    #[test]
    fn unknown_descriptor_is_rejected() {
        let result: Result<RulesetConfig, _> = serde_json::from_value(json!({
            "rules": { "no-eval": "severe" }
        }));

        assert!(result.is_err());
    }

    #[test]
    fn flat_config_takes_the_first_entry() {
        let config = RulesetConfig::from_flat_config(
            r#"[
                {
                    "languageOptions": { "ecmaVersion": "latest", "sourceType": "module" },
                    "rules": { "no-eval": "error", "no-with": "off" }
                },
                { "rules": { "ignored": "error" } }
            ]"#,
        )
        .unwrap();

        assert!(config.is_enabled("no-eval"));
        assert!(!config.is_enabled("ignored"));
    }

    #[test]
    fn flat_config_preserves_document_order() {
        let config = RulesetConfig::from_flat_config(
            r#"[{ "rules": { "zeta": "error", "alpha": "warn", "mid": "off" } }]"#,
        )
        .unwrap();

        let names: Vec<&str> = config.rules.keys().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn empty_flat_config_is_an_error() {
        let err = RulesetConfig::from_flat_config("[]").unwrap_err();
        assert!(matches!(err, ConfigError::Empty));
    }

    #[test]
    fn enabled_rules_skips_disabled_in_order() {
        let config = RulesetConfig::default()
            .with_rule("first", RuleState::error())
            .with_rule("dark", RuleState::off())
            .with_rule("second", RuleState::warn());

        let enabled: Vec<&str> = config.enabled_rules().collect();
        assert_eq!(enabled, vec!["first", "second"]);
    }

    #[test]
    fn default_security_ruleset_matches_expectations() {
        let ruleset = Ruleset::security();

        assert_eq!(ruleset.category, RuleCategory::Security);
        assert!(ruleset.config.is_enabled("no-eval"));
        assert!(ruleset.config.is_enabled("no-implied-eval"));
        assert!(ruleset.config.is_enabled("no-script-url"));
        assert!(!ruleset.config.is_enabled("no-new-func"));
        assert!(!ruleset.config.is_enabled("eqeqeq"));
    }

    #[test]
    fn default_standard_ruleset_matches_expectations() {
        let ruleset = Ruleset::standard();

        assert_eq!(ruleset.category, RuleCategory::Standard);
        assert!(ruleset.config.is_enabled("no-debugger"));
        assert!(!ruleset.config.is_enabled("no-console"));
        assert!(!ruleset.config.is_enabled("semi"));
    }

    #[test]
    fn default_rulesets_are_disjoint() {
        let security = Ruleset::security();
        let standard = Ruleset::standard();

        for rule in security.config.rules.keys() {
            assert!(
                !standard.config.rules.contains_key(rule),
                "rule {rule} configured in both rule sets"
            );
        }
    }

    #[test]
    fn rule_state_roundtrips_through_json() {
        let state: RuleState = serde_json::from_value(json!(["warn", { "max": 3 }])).unwrap();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json, json!(["warn", { "max": 3 }]));

        let plain: RuleState = serde_json::from_value(json!("error")).unwrap();
        assert_eq!(serde_json::to_value(&plain).unwrap(), json!("error"));
    }
}
