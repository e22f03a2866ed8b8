use crate::rules::{RuleId, Severity};
use serde::{Serialize, Serializer};
use tessera_parser::Span;

fn serialize_span<S: Serializer>(span: &Span, serializer: S) -> Result<S::Ok, S::Error> {
    (span.start(), span.end()).serialize(serializer)
}

/// One replacement inside a [`Fix`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edit {
    /// The byte range to replace.
    #[serde(serialize_with = "serialize_span")]
    pub span: Span,
    pub replacement: String,
}

/// A machine-applicable suggestion attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fix {
    pub description: String,
    pub edits: Vec<Edit>,
}

/// A structured lint finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    #[serde(rename = "rule_id")]
    pub rule: RuleId,
    pub message: String,
    pub severity: Severity,
    #[serde(serialize_with = "serialize_span")]
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Diagnostic {
    pub(crate) fn new(rule: RuleId, severity: Severity, message: String, span: Span) -> Self {
        Self {
            rule,
            message,
            severity,
            span,
            fix: None,
        }
    }

    pub(crate) fn with_fix(mut self, description: String, edits: Vec<Edit>) -> Self {
        self.fix = Some(Fix { description, edits });
        self
    }
}

/// Apply a set of edits to `source`, returning the rewritten text.
///
/// Edits are applied in ascending span order. Overlapping edits are not
/// supported: an edit whose span starts inside an already-applied
/// replacement is dropped, so the earlier-starting edit wins.
pub fn apply_edits(source: &str, edits: &[Edit]) -> String {
    let mut ordered: Vec<&Edit> = edits.iter().collect();
    ordered.sort_by_key(|edit| edit.span.start());

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in ordered {
        let start = edit.span.start().min(source.len());
        let end = edit.span.end().min(source.len());
        if start < cursor {
            continue;
        }
        output.push_str(&source[cursor..start]);
        output.push_str(&edit.replacement);
        cursor = end;
    }
    output.push_str(&source[cursor..]);
    output
}

#[cfg(test)]
mod tests {
    use super::{apply_edits, Edit};
    use pretty_assertions::assert_eq;
    use tessera_parser::Span;

    #[test]
    fn edits_apply_in_source_order() {
        let source = "[1, 2, 3]";
        let edits = vec![
            Edit {
                span: Span::new(7, 8),
                replacement: "30".to_string(),
            },
            Edit {
                span: Span::new(1, 2),
                replacement: "10".to_string(),
            },
        ];
        assert_eq!(apply_edits(source, &edits), "[10, 2, 30]");
    }

    #[test]
    fn deleting_a_range() {
        let source = r#"{"a":1,"b":2}"#;
        let edits = vec![Edit {
            span: Span::new(6, 12),
            replacement: String::new(),
        }];
        assert_eq!(apply_edits(source, &edits), r#"{"a":1}"#);
    }

    #[test]
    fn overlapping_edits_keep_the_earlier_one() {
        let source = "abcdef";
        let edits = vec![
            Edit {
                span: Span::new(2, 5),
                replacement: "Y".to_string(),
            },
            Edit {
                span: Span::new(1, 4),
                replacement: "X".to_string(),
            },
        ];
        assert_eq!(apply_edits(source, &edits), "aXef");
    }
}
