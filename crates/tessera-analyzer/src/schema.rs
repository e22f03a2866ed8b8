use indexmap::IndexMap;
use serde::Serialize;
use tessera_parser::{Node, NodeId, SyntaxTree};

/// Options controlling schema extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaOptions {
    /// Infer a single item schema for arrays whose elements all share a
    /// type; otherwise array items are `any`.
    pub infer_array_types: bool,
    /// Nesting depth beyond which everything becomes `any`.
    pub max_schema_depth: usize,
    /// How many example values to retain per leaf type.
    pub max_examples: usize,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            infer_array_types: true,
            max_schema_depth: 20,
            max_examples: 3,
        }
    }
}

impl SchemaOptions {
    pub fn infer_array_types(mut self, value: bool) -> Self {
        self.infer_array_types = value;
        self
    }

    pub fn max_schema_depth(mut self, value: usize) -> Self {
        self.max_schema_depth = value;
        self
    }

    pub fn max_examples(mut self, value: usize) -> Self {
        self.max_examples = value;
        self
    }
}

/// The shape of a schema node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    String,
    Number,
    Boolean,
    Null,
    Any,
    Object {
        properties: IndexMap<String, Schema>,
    },
    Array {
        /// `None` means the item type is `any`.
        items: Option<Box<Schema>>,
    },
}

/// A recursive schema inferred from one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub kind: SchemaKind,
    /// Set when merging found `null` alongside another type.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
    /// Raw example values retained for documentation.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

impl Schema {
    pub(crate) fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            nullable: false,
            examples: Vec::new(),
        }
    }

    pub fn any() -> Self {
        Self::new(SchemaKind::Any)
    }

    /// Structural type equality: ignores nullability and examples.
    pub fn same_type(&self, other: &Schema) -> bool {
        match (&self.kind, &other.kind) {
            (SchemaKind::String, SchemaKind::String)
            | (SchemaKind::Number, SchemaKind::Number)
            | (SchemaKind::Boolean, SchemaKind::Boolean)
            | (SchemaKind::Null, SchemaKind::Null)
            | (SchemaKind::Any, SchemaKind::Any) => true,
            (
                SchemaKind::Object { properties: a },
                SchemaKind::Object { properties: b },
            ) => {
                a.len() == b.len()
                    && a.iter().all(|(key, schema)| {
                        b.get(key).is_some_and(|other| schema.same_type(other))
                    })
            }
            (SchemaKind::Array { items: a }, SchemaKind::Array { items: b }) => match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => a.same_type(b),
                _ => false,
            },
            _ => false,
        }
    }
}

/// Walk the tree and produce its schema.
///
/// Structural anomalies (error nodes, empty input) degrade to `any`
/// rather than failing.
///
/// ## Example
/// ```rust
/// use tessera_analyzer::{extract_schema, SchemaKind, SchemaOptions};
/// use tessera_parser::Parser;
///
/// let tree = Parser::new(r#"{"id": 1, "tags": ["a", "b"]}"#).parse().unwrap();
/// let schema = extract_schema(&tree, &SchemaOptions::default());
/// let SchemaKind::Object { properties } = &schema.kind else {
///     panic!("expected an object schema");
/// };
/// assert_eq!(properties["id"].kind, SchemaKind::Number);
/// ```
pub fn extract_schema(tree: &SyntaxTree, options: &SchemaOptions) -> Schema {
    match tree.root_value() {
        Some(id) => schema_of(tree, id, options, 0),
        None => Schema::any(),
    }
}

fn schema_of(tree: &SyntaxTree, id: NodeId, options: &SchemaOptions, depth: usize) -> Schema {
    if depth >= options.max_schema_depth {
        return Schema::any();
    }
    match tree.node(id) {
        Node::String { value, .. } => {
            let mut schema = Schema::new(SchemaKind::String);
            push_example(&mut schema, tree.resolve(*value), options);
            schema
        }
        Node::Number { .. } => {
            let mut schema = Schema::new(SchemaKind::Number);
            push_example(&mut schema, tree.text(id), options);
            schema
        }
        Node::Boolean { value } => {
            let mut schema = Schema::new(SchemaKind::Boolean);
            push_example(&mut schema, if *value { "true" } else { "false" }, options);
            schema
        }
        Node::Null => Schema::new(SchemaKind::Null),
        Node::Object { properties } => {
            let mut map = IndexMap::new();
            for &child in tree.children(*properties) {
                if let Node::Property { key, value } = tree.node(child) {
                    if let Some(name) = tree.string_value(*key) {
                        // Duplicate keys: the last occurrence wins, like
                        // most JSON readers.
                        map.insert(
                            name.to_string(),
                            schema_of(tree, *value, options, depth + 1),
                        );
                    }
                }
            }
            Schema::new(SchemaKind::Object { properties: map })
        }
        Node::Array { elements } => {
            let children = tree.children(*elements);
            if !options.infer_array_types || children.is_empty() {
                return Schema::new(SchemaKind::Array { items: None });
            }
            let mut item: Option<Schema> = None;
            let mut nullable = false;
            for &child in children {
                let schema = schema_of(tree, child, options, depth + 1);
                if schema.kind == SchemaKind::Null {
                    nullable = true;
                    continue;
                }
                match &mut item {
                    None => item = Some(schema),
                    Some(existing) => {
                        if existing.same_type(&schema) {
                            merge_examples(existing, schema, options);
                        } else {
                            // Mixed element types: fall back to `any`.
                            return Schema::new(SchemaKind::Array { items: None });
                        }
                    }
                }
            }
            let items = match item {
                Some(mut item) => {
                    item.nullable = nullable;
                    Some(Box::new(item))
                }
                // All elements were null.
                None => Some(Box::new(Schema::new(SchemaKind::Null))),
            };
            Schema::new(SchemaKind::Array { items })
        }
        Node::Error { .. } => Schema::any(),
        Node::Root { .. } | Node::Property { .. } => Schema::any(),
    }
}

fn push_example(schema: &mut Schema, value: &str, options: &SchemaOptions) {
    if schema.examples.len() < options.max_examples {
        let example = value.to_string();
        if !schema.examples.contains(&example) {
            schema.examples.push(example);
        }
    }
}

fn merge_examples(into: &mut Schema, from: Schema, options: &SchemaOptions) {
    for example in from.examples {
        if into.examples.len() >= options.max_examples {
            break;
        }
        if !into.examples.contains(&example) {
            into.examples.push(example);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tessera_parser::Parser;

    fn schema(source: &str) -> Schema {
        let tree = Parser::new(source).parse().unwrap();
        extract_schema(&tree, &SchemaOptions::default())
    }

    #[test]
    fn primitives() {
        assert_eq!(schema(r#""x""#).kind, SchemaKind::String);
        assert_eq!(schema("1.5").kind, SchemaKind::Number);
        assert_eq!(schema("true").kind, SchemaKind::Boolean);
        assert_eq!(schema("null").kind, SchemaKind::Null);
    }

    #[test]
    fn uniform_arrays_infer_their_item_type() {
        let schema = schema("[1, 2, 3]");
        let SchemaKind::Array { items: Some(item) } = &schema.kind else {
            panic!("expected an inferred array schema");
        };
        assert_eq!(item.kind, SchemaKind::Number);
        assert!(!item.nullable);
    }

    #[test]
    fn mixed_arrays_are_any() {
        let schema = schema(r#"[1, "two"]"#);
        assert_eq!(schema.kind, SchemaKind::Array { items: None });
    }

    #[test]
    fn nulls_make_the_item_type_nullable() {
        let schema = schema(r#"["a", null, "b"]"#);
        let SchemaKind::Array { items: Some(item) } = &schema.kind else {
            panic!("expected an inferred array schema");
        };
        assert_eq!(item.kind, SchemaKind::String);
        assert!(item.nullable);
    }

    #[test]
    fn object_schemas_preserve_property_order() {
        let schema = schema(r#"{"z": 1, "a": "x"}"#);
        let SchemaKind::Object { properties } = &schema.kind else {
            panic!("expected an object schema");
        };
        let keys: Vec<&str> = properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn depth_cap_degrades_to_any() {
        let source = format!("{}1{}", "[".repeat(10), "]".repeat(10));
        let tree = Parser::new(&source).parse().unwrap();
        let capped = extract_schema(&tree, &SchemaOptions::default().max_schema_depth(3));

        let mut cursor = &capped;
        for _ in 0..3 {
            let SchemaKind::Array { items: Some(item) } = &cursor.kind else {
                panic!("expected an array schema");
            };
            cursor = item;
        }
        assert_eq!(cursor.kind, SchemaKind::Any);
    }

    #[test]
    fn examples_are_retained_and_bounded() {
        let schema = schema(r#"["a", "b", "c", "d"]"#);
        let SchemaKind::Array { items: Some(item) } = &schema.kind else {
            panic!("expected an inferred array schema");
        };
        assert_eq!(item.examples, vec!["a", "b", "c"]);
    }

    #[test]
    fn error_nodes_degrade_to_any() {
        let tree = Parser::new("[0, 01, 2]").parse().unwrap();
        let schema = extract_schema(&tree, &SchemaOptions::default());
        // The error element breaks type uniformity, so items become any.
        assert_eq!(schema.kind, SchemaKind::Array { items: None });
    }
}
