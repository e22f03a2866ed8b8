use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Identifiers for the built-in rules.
///
/// The set of rules is a compile-time constant; which of them run, and at
/// which severity, is chosen per lint invocation through a [`RuleSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    /// Two properties in one object share the same decoded key.
    NoDuplicateKeys,
    /// Number raw text has a leading zero in the mantissa.
    NoLeadingZeros,
    /// String content needed U+FFFD substitution while decoding.
    ValidStringEncoding,
    /// Unknown or incomplete backslash sequence inside a string.
    InvalidEscapeSequence,
    /// Nesting depth beyond the configured hard maximum.
    MaxDepthExceeded,
    /// Nesting depth beyond the configured soft threshold.
    DeepNesting,
    /// More fractional digits than the configured maximum.
    LargeNumberPrecision,
    /// String length, object key count, or array length out of bounds.
    LargeStructure,
    /// Object property key is not a string.
    InvalidKeyType,
}

impl RuleId {
    pub const ALL: [RuleId; 9] = [
        RuleId::NoDuplicateKeys,
        RuleId::NoLeadingZeros,
        RuleId::ValidStringEncoding,
        RuleId::InvalidEscapeSequence,
        RuleId::MaxDepthExceeded,
        RuleId::DeepNesting,
        RuleId::LargeNumberPrecision,
        RuleId::LargeStructure,
        RuleId::InvalidKeyType,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleId::NoDuplicateKeys => "no_duplicate_keys",
            RuleId::NoLeadingZeros => "no_leading_zeros",
            RuleId::ValidStringEncoding => "valid_string_encoding",
            RuleId::InvalidEscapeSequence => "invalid_escape_sequence",
            RuleId::MaxDepthExceeded => "max_depth_exceeded",
            RuleId::DeepNesting => "deep_nesting",
            RuleId::LargeNumberPrecision => "large_number_precision",
            RuleId::LargeStructure => "large_structure",
            RuleId::InvalidKeyType => "invalid_key_type",
        }
    }

    pub fn default_severity(self) -> Severity {
        match self {
            RuleId::NoDuplicateKeys => Severity::Error,
            RuleId::NoLeadingZeros => Severity::Warning,
            RuleId::ValidStringEncoding => Severity::Error,
            RuleId::InvalidEscapeSequence => Severity::Error,
            RuleId::MaxDepthExceeded => Severity::Error,
            RuleId::DeepNesting => Severity::Warning,
            RuleId::LargeNumberPrecision => Severity::Warning,
            RuleId::LargeStructure => Severity::Warning,
            RuleId::InvalidKeyType => Severity::Error,
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleId {
    type Err = UnknownRule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleId::ALL
            .into_iter()
            .find(|rule| rule.as_str() == s)
            .ok_or_else(|| UnknownRule(s.to_string()))
    }
}

/// Returned when parsing an unrecognized rule name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRule(pub String);

impl fmt::Display for UnknownRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown lint rule `{}`", self.0)
    }
}

impl std::error::Error for UnknownRule {}

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Hint,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Hint => "hint",
        };
        f.write_str(name)
    }
}

/// The rules enabled for one lint invocation, each with a severity.
///
/// ```rust
/// use tessera_linter::{RuleId, RuleSet, Severity};
///
/// let rules = RuleSet::none()
///     .with(RuleId::NoDuplicateKeys)
///     .with_severity(RuleId::DeepNesting, Severity::Error);
/// assert_eq!(rules.enabled(RuleId::NoDuplicateKeys), Some(Severity::Error));
/// assert_eq!(rules.enabled(RuleId::NoLeadingZeros), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    severities: IndexMap<RuleId, Severity>,
}

impl RuleSet {
    /// No rules enabled; linting with this set reports nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every built-in rule at its default severity.
    pub fn all() -> Self {
        let mut set = Self::default();
        for rule in RuleId::ALL {
            set.severities.insert(rule, rule.default_severity());
        }
        set
    }

    /// Enable a rule at its default severity.
    pub fn with(mut self, rule: RuleId) -> Self {
        self.severities.insert(rule, rule.default_severity());
        self
    }

    /// Enable a rule at an explicit severity.
    pub fn with_severity(mut self, rule: RuleId, severity: Severity) -> Self {
        self.severities.insert(rule, severity);
        self
    }

    /// Disable a rule.
    pub fn without(mut self, rule: RuleId) -> Self {
        self.severities.shift_remove(&rule);
        self
    }

    /// The severity a rule runs at, or `None` when disabled.
    pub fn enabled(&self, rule: RuleId) -> Option<Severity> {
        self.severities.get(&rule).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.severities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.severities.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RuleId, Severity)> + '_ {
        self.severities.iter().map(|(rule, severity)| (*rule, *severity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rule_names_round_trip() {
        for rule in RuleId::ALL {
            assert_eq!(rule.as_str().parse::<RuleId>().unwrap(), rule);
        }
        assert!("no_such_rule".parse::<RuleId>().is_err());
    }

    #[test]
    fn all_set_carries_default_severities() {
        let rules = RuleSet::all();
        assert_eq!(rules.len(), RuleId::ALL.len());
        assert_eq!(
            rules.enabled(RuleId::NoLeadingZeros),
            Some(Severity::Warning),
        );
        assert_eq!(
            rules.enabled(RuleId::NoDuplicateKeys),
            Some(Severity::Error),
        );
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert!(Severity::Info > Severity::Hint);
    }
}
