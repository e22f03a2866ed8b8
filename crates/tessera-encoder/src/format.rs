use crate::escape::write_quoted;
use crate::error::EncodeError;
use crate::options::{FormatOptions, QuoteStyle};
use tessera_parser::{Node, NodeId, SyntaxTree};

/// Chosen per container by the layout heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Compact,
    Multiline,
}

pub(crate) struct State<'a> {
    tree: &'a SyntaxTree,
    options: &'a FormatOptions,
    indent_unit: String,
    indent_level: usize,
    output: String,
}

impl<'a> State<'a> {
    pub(crate) fn new(tree: &'a SyntaxTree, options: &'a FormatOptions) -> Self {
        Self {
            tree,
            options,
            indent_unit: options.indent_unit(),
            indent_level: 0,
            output: String::with_capacity(tree.source().len()),
        }
    }

    fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn new_line(&mut self) {
        self.output.push('\n');
        for _ in 0..self.indent_level {
            self.output.push_str(&self.indent_unit);
        }
    }

    /// Emit one value node.
    fn value(&mut self, id: NodeId) {
        let tree = self.tree;
        match tree.node(id) {
            Node::Object { properties } => self.object(id, *properties),
            Node::Array { elements } => self.array(id, *elements),
            Node::String { value, .. } => {
                let quote = self.quote_for(id);
                write_quoted(&mut self.output, tree.resolve(*value), quote);
            }
            // Numbers are reproduced verbatim so precision and the author's
            // chosen representation survive.
            Node::Number { .. } => self.write(tree.text(id)),
            Node::Boolean { value } => self.write(if *value { "true" } else { "false" }),
            Node::Null => self.write("null"),
            // Error nodes round-trip their raw source text so a recovered
            // document still formats into something inspectable.
            Node::Error { .. } => {
                let raw = tree.text(id);
                if raw.is_empty() {
                    self.write("null");
                } else {
                    self.write(raw);
                }
            }
            Node::Root { .. } | Node::Property { .. } => {
                debug_assert!(false, "not a value node");
            }
        }
    }

    fn quote_for(&self, id: NodeId) -> char {
        match self.options.quote_style {
            QuoteStyle::Double => '"',
            QuoteStyle::Single => '\'',
            QuoteStyle::Preserve => {
                if self.tree.text(id).starts_with('\'') {
                    '\''
                } else {
                    '"'
                }
            }
        }
    }

    fn object(&mut self, id: NodeId, properties: tessera_parser::Children) {
        let mut children: Vec<NodeId> = self.tree.children(properties).to_vec();
        if self.options.sort_keys {
            // Stable byte-wise comparison of decoded keys; error entries
            // have no key and sort by their original position.
            children.sort_by(|a, b| {
                let ka = self.tree.key_text(*a);
                let kb = self.tree.key_text(*b);
                match (ka, kb) {
                    (Some(ka), Some(kb)) => ka.as_bytes().cmp(kb.as_bytes()),
                    _ => std::cmp::Ordering::Equal,
                }
            });
        }

        if children.is_empty() {
            self.write("{}");
            return;
        }

        match self.layout(&children, self.options.compact_objects) {
            Layout::Compact => {
                self.write("{");
                for (index, child) in children.iter().enumerate() {
                    if index > 0 {
                        self.comma_compact();
                    }
                    self.member(*child, Layout::Compact);
                }
                self.write("}");
            }
            Layout::Multiline => {
                self.write("{");
                self.indent_level += 1;
                for (index, child) in children.iter().enumerate() {
                    if index > 0 {
                        self.write(",");
                    }
                    self.new_line();
                    self.member(*child, Layout::Multiline);
                }
                if self.options.trailing_comma {
                    self.write(",");
                }
                self.indent_level -= 1;
                self.new_line();
                self.write("}");
            }
        }
    }

    /// One object member: a property, or an error node kept during
    /// recovery.
    fn member(&mut self, id: NodeId, layout: Layout) {
        match self.tree.node(id) {
            Node::Property { key, value } => {
                let key = *key;
                let value = *value;
                self.value(key);
                match layout {
                    Layout::Compact => {
                        self.write(":");
                        if self.options.space_after_colon {
                            self.write(" ");
                        }
                    }
                    Layout::Multiline => self.write(": "),
                }
                self.value(value);
            }
            _ => self.value(id),
        }
    }

    fn array(&mut self, id: NodeId, elements: tessera_parser::Children) {
        let children: Vec<NodeId> = self.tree.children(elements).to_vec();
        if children.is_empty() {
            self.write("[]");
            return;
        }

        match self.layout(&children, self.options.compact_arrays) {
            Layout::Compact => {
                self.write("[");
                for (index, child) in children.iter().enumerate() {
                    if index > 0 {
                        self.comma_compact();
                    }
                    self.value(*child);
                }
                self.write("]");
            }
            Layout::Multiline => {
                self.write("[");
                self.indent_level += 1;
                for (index, child) in children.iter().enumerate() {
                    if index > 0 {
                        self.write(",");
                    }
                    self.new_line();
                    self.value(*child);
                }
                if self.options.trailing_comma {
                    self.write(",");
                }
                self.indent_level -= 1;
                self.new_line();
                self.write("]");
            }
        }
    }

    fn comma_compact(&mut self) {
        self.write(",");
        if self.options.space_after_comma {
            self.write(" ");
        }
    }

    /// The compact-vs-multiline decision for one non-empty container.
    fn layout(&self, children: &[NodeId], compact_allowed: bool) -> Layout {
        if self.options.force_compact {
            return Layout::Compact;
        }
        if self.options.force_multiline {
            return Layout::Multiline;
        }
        if !compact_allowed {
            return Layout::Multiline;
        }
        if children.iter().any(|child| self.has_container(*child)) {
            return Layout::Multiline;
        }
        let estimate: usize = children.iter().map(|child| self.estimate(*child)).sum();
        if estimate <= (self.options.line_width / 2) as usize {
            Layout::Compact
        } else {
            Layout::Multiline
        }
    }

    /// Whether this child is (or wraps) a container.
    fn has_container(&self, id: NodeId) -> bool {
        match self.tree.node(id) {
            Node::Property { value, .. } => self.tree.node(*value).is_container(),
            node => node.is_container(),
        }
    }

    /// Cheap single-line width estimate; never measures actual output.
    fn estimate(&self, id: NodeId) -> usize {
        match self.tree.node(id) {
            Node::String { value, .. } => self.tree.resolve(*value).len() + 2,
            Node::Number { .. } => self.tree.span(id).len(),
            Node::Boolean { value } => {
                if *value {
                    4
                } else {
                    5
                }
            }
            Node::Null => 4,
            Node::Property { key, value } => self.estimate(*key) + self.estimate(*value) + 2,
            Node::Object { properties } => properties.len() * 4,
            Node::Array { elements } => elements.len() * 4,
            Node::Error { .. } => self.tree.span(id).len(),
            Node::Root { .. } => 0,
        }
    }

    pub(crate) fn finish(mut self) -> String {
        // Multiline documents end with a newline; compact ones and bare
        // leaves do not.
        if self.output.contains('\n') {
            self.output.push('\n');
        }
        self.output
    }

    pub(crate) fn run(mut self) -> String {
        if let Some(value) = self.tree.root_value() {
            self.value(value);
        }
        self.finish()
    }
}

/// Format a parsed tree.
///
/// ## Example
/// ```rust
/// use tessera_encoder::{format, FormatOptions};
/// use tessera_parser::Parser;
///
/// let tree = Parser::new(r#"{"name":"Alice","age":30}"#).parse().unwrap();
/// let output = format(&tree, &FormatOptions::default()).unwrap();
/// assert_eq!(output, "{\n  \"name\": \"Alice\",\n  \"age\": 30\n}\n");
/// ```
pub fn format(tree: &SyntaxTree, options: &FormatOptions) -> Result<String, EncodeError> {
    options.validate()?;
    Ok(State::new(tree, options).run())
}

/// Parse `source` (strict RFC 8259) and format the result; recovered error
/// nodes pass their original text through.
pub fn format_source(source: &str, options: &FormatOptions) -> Result<String, EncodeError> {
    let tree = tessera_parser::parse(source)?;
    format(&tree, options)
}

/// Like [`format_source`], with explicit parse options (JSON5 input, depth
/// limits).
pub fn format_source_with(
    source: &str,
    parse_options: tessera_parser::ParserOptions,
    options: &FormatOptions,
) -> Result<String, EncodeError> {
    let tree = tessera_parser::parse_with(source, parse_options)?;
    format(&tree, options)
}
