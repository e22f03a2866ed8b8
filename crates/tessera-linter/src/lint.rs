use crate::diagnostic::{Diagnostic, Edit};
use crate::options::LintOptions;
use crate::rules::{RuleId, RuleSet};
use indexmap::IndexMap;
use tessera_parser::{Node, NodeId, Span, SyntaxTree};

/// Run the enabled rules over a tree.
///
/// Linting never fails: it returns diagnostics in pre-order traversal
/// order, and an empty rule set reports nothing. Cost is O(n) over node
/// count; duplicate-key detection is amortized O(k) per object of k keys.
///
/// ## Example
/// ```rust
/// use tessera_linter::{lint, LintOptions, RuleSet};
/// use tessera_parser::Parser;
///
/// let tree = Parser::new(r#"{"key":1,"key":2}"#).parse().unwrap();
/// let diagnostics = lint(&tree, &RuleSet::all(), &LintOptions::default());
/// assert_eq!(diagnostics.len(), 1);
/// assert_eq!(diagnostics[0].rule.as_str(), "no_duplicate_keys");
/// ```
pub fn lint(tree: &SyntaxTree, rules: &RuleSet, options: &LintOptions) -> Vec<Diagnostic> {
    if rules.is_empty() {
        return Vec::new();
    }
    let mut linter = Linter {
        tree,
        rules,
        options,
        diagnostics: Vec::new(),
    };
    for (id, depth) in tree.preorder() {
        linter.check(id, depth as usize);
    }
    linter.diagnostics
}

struct Linter<'a> {
    tree: &'a SyntaxTree,
    rules: &'a RuleSet,
    options: &'a LintOptions,
    diagnostics: Vec<Diagnostic>,
}

impl Linter<'_> {
    fn report(&mut self, rule: RuleId, message: String, span: Span) {
        if let Some(severity) = self.rules.enabled(rule) {
            self.diagnostics
                .push(Diagnostic::new(rule, severity, message, span));
        }
    }

    fn check(&mut self, id: NodeId, depth: usize) {
        let tree = self.tree;
        match tree.node(id) {
            Node::Object { properties } => {
                self.depth_checks(id, depth);
                let children = tree.children(*properties);
                if children.len() > self.options.max_object_keys {
                    self.report(
                        RuleId::LargeStructure,
                        format!(
                            "object has {} keys, more than the maximum of {}",
                            children.len(),
                            self.options.max_object_keys
                        ),
                        tree.span(id),
                    );
                }
                self.object_keys(id, children);
            }
            Node::Array { elements } => {
                self.depth_checks(id, depth);
                if elements.len() > self.options.max_array_elements {
                    self.report(
                        RuleId::LargeStructure,
                        format!(
                            "array has {} elements, more than the maximum of {}",
                            elements.len(),
                            self.options.max_array_elements
                        ),
                        tree.span(id),
                    );
                }
            }
            Node::String {
                value,
                lossy,
                bad_escape,
            } => {
                let content = tree.resolve(*value);
                if content.len() > self.options.max_string_length {
                    self.report(
                        RuleId::LargeStructure,
                        format!(
                            "string is {} bytes long, more than the maximum of {}",
                            content.len(),
                            self.options.max_string_length
                        ),
                        tree.span(id),
                    );
                }
                if *lossy {
                    self.report(
                        RuleId::ValidStringEncoding,
                        "string content is not valid UTF-8; lone surrogates were replaced with U+FFFD"
                            .to_string(),
                        tree.span(id),
                    );
                }
                if *bad_escape {
                    self.report(
                        RuleId::InvalidEscapeSequence,
                        "string contains an unknown or incomplete escape sequence".to_string(),
                        tree.span(id),
                    );
                }
            }
            Node::Number { .. } => {
                let raw = tree.text(id);
                self.leading_zeros(raw, tree.span(id));
                self.precision(raw, tree.span(id));
            }
            // Recovery can leave rejected numbers as error nodes; the
            // leading-zero rule still applies to their raw text.
            Node::Error { .. } => {
                let raw = tree.text(id);
                if looks_like_number(raw) {
                    self.leading_zeros(raw, tree.span(id));
                }
            }
            Node::Root { .. } | Node::Property { .. } | Node::Boolean { .. } | Node::Null => {}
        }
    }

    /// Both nesting rules; `depth + 1` is how many containers enclose this
    /// node, counting itself.
    fn depth_checks(&mut self, id: NodeId, depth: usize) {
        let containers_deep = depth + 1;
        if containers_deep == self.options.max_depth + 1 {
            self.report(
                RuleId::MaxDepthExceeded,
                format!(
                    "nesting depth exceeds the maximum of {}",
                    self.options.max_depth
                ),
                self.tree.span(id),
            );
        }
        if containers_deep == self.options.deep_nesting_threshold + 1 {
            self.report(
                RuleId::DeepNesting,
                format!(
                    "nesting depth exceeds the soft threshold of {}",
                    self.options.deep_nesting_threshold
                ),
                self.tree.span(id),
            );
        }
    }

    /// Duplicate-key and key-type checks over one object's members.
    fn object_keys(&mut self, object: NodeId, children: &[NodeId]) {
        let tree = self.tree;
        let mut seen: IndexMap<&str, Span> = IndexMap::with_capacity(children.len());
        let mut prev_end = tree.span(object).start() + 1;

        for &child in children {
            if let Node::Property { key, .. } = tree.node(child) {
                let key = *key;
                match tree.string_value(key) {
                    Some(text) => {
                        let key_span = tree.span(key);
                        if let Some(first) = seen.get(text) {
                            // The second occurrence is reported; the first
                            // definition is the one a fix keeps.
                            if let Some(severity) = self.rules.enabled(RuleId::NoDuplicateKeys) {
                                let message = format!(
                                    "duplicate key `{text}`; first defined at offset {}",
                                    first.start()
                                );
                                let edits = vec![Edit {
                                    span: Span::new(prev_end, tree.span(child).end()),
                                    replacement: String::new(),
                                }];
                                self.diagnostics.push(
                                    Diagnostic::new(
                                        RuleId::NoDuplicateKeys,
                                        severity,
                                        message,
                                        key_span,
                                    )
                                    .with_fix(
                                        format!(
                                            "remove this duplicate of `{text}` and keep the first definition"
                                        ),
                                        edits,
                                    ),
                                );
                            }
                        } else {
                            seen.insert(text, key_span);
                        }
                    }
                    None => {
                        self.report(
                            RuleId::InvalidKeyType,
                            "object property key is not a string".to_string(),
                            tree.span(key),
                        );
                    }
                }
            }
            prev_end = tree.span(child).end();
        }
    }

    fn leading_zeros(&mut self, raw: &str, span: Span) {
        let mantissa = raw.strip_prefix('-').unwrap_or(raw);
        if mantissa.len() > 1
            && mantissa.starts_with('0')
            && mantissa.as_bytes()[1].is_ascii_digit()
        {
            if let Some(severity) = self.rules.enabled(RuleId::NoLeadingZeros) {
                let message = format!("number `{raw}` has leading zeros");
                let edits = vec![Edit {
                    span,
                    replacement: strip_leading_zeros(raw),
                }];
                self.diagnostics.push(
                    Diagnostic::new(RuleId::NoLeadingZeros, severity, message, span)
                        .with_fix("remove the leading zeros".to_string(), edits),
                );
            }
        }
    }

    fn precision(&mut self, raw: &str, span: Span) {
        if let Some(dot) = raw.find('.') {
            let digits = raw[dot + 1..]
                .bytes()
                .take_while(u8::is_ascii_digit)
                .count();
            if digits > self.options.max_number_precision {
                self.report(
                    RuleId::LargeNumberPrecision,
                    format!(
                        "number has {digits} decimal digits, more than the maximum of {}",
                        self.options.max_number_precision
                    ),
                    span,
                );
            }
        }
    }
}

/// Whether an error node's raw text has the shape of a number token.
fn looks_like_number(raw: &str) -> bool {
    !raw.is_empty()
        && raw.starts_with(|c: char| c == '-' || c.is_ascii_digit())
        && raw
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E'))
}

/// `007` to `7`, `-00.5` to `-0.5`, `000` to `0`.
fn strip_leading_zeros(raw: &str) -> String {
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw),
    };
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        format!("{sign}0")
    } else if trimmed.starts_with(|c: char| !c.is_ascii_digit()) {
        format!("{sign}0{trimmed}")
    } else {
        format!("{sign}{trimmed}")
    }
}
