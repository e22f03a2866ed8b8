use serde::Serialize;
use tessera_parser::{Node, SyntaxTree};

/// Shape and size measurements for one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub strings: usize,
    pub numbers: usize,
    pub booleans: usize,
    pub nulls: usize,
    pub objects: usize,
    pub arrays: usize,
    /// Deepest container nesting; a bare leaf document is depth 0.
    pub max_depth: usize,
    /// Total property count across all objects.
    pub total_keys: usize,
    /// Size of the source text in bytes.
    pub byte_size: usize,
    /// `2·depth + 1.5·objects + 1.2·arrays + 0.5·keys + ln(size)`.
    pub complexity_score: f64,
}

/// Count nodes, measure nesting, and score complexity in one pass.
///
/// ## Example
/// ```rust
/// use tessera_analyzer::statistics;
/// use tessera_parser::Parser;
///
/// let tree = Parser::new(r#"{"a": [1, 2], "b": null}"#).parse().unwrap();
/// let stats = statistics(&tree);
/// assert_eq!(stats.numbers, 2);
/// assert_eq!(stats.max_depth, 2);
/// assert_eq!(stats.total_keys, 2);
/// ```
pub fn statistics(tree: &SyntaxTree) -> Statistics {
    let mut stats = Statistics {
        strings: 0,
        numbers: 0,
        booleans: 0,
        nulls: 0,
        objects: 0,
        arrays: 0,
        max_depth: 0,
        total_keys: 0,
        byte_size: tree.source().len(),
        complexity_score: 0.0,
    };

    for (id, depth) in tree.preorder() {
        match tree.node(id) {
            Node::String { .. } => stats.strings += 1,
            Node::Number { .. } => stats.numbers += 1,
            Node::Boolean { .. } => stats.booleans += 1,
            Node::Null => stats.nulls += 1,
            Node::Object { .. } => {
                stats.objects += 1;
                stats.max_depth = stats.max_depth.max(depth as usize + 1);
            }
            Node::Array { .. } => {
                stats.arrays += 1;
                stats.max_depth = stats.max_depth.max(depth as usize + 1);
            }
            Node::Property { .. } => stats.total_keys += 1,
            Node::Root { .. } | Node::Error { .. } => {}
        }
    }

    let size_term = if stats.byte_size > 0 {
        (stats.byte_size as f64).ln()
    } else {
        0.0
    };
    stats.complexity_score = 2.0 * stats.max_depth as f64
        + 1.5 * stats.objects as f64
        + 1.2 * stats.arrays as f64
        + 0.5 * stats.total_keys as f64
        + size_term;

    stats
}
