use crate::schema::{extract_schema, Schema, SchemaKind, SchemaOptions};
use std::collections::VecDeque;
use tessera_parser::SyntaxTree;

/// Options controlling TypeScript projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeScriptOptions {
    /// Whether to `export` the generated declarations.
    pub export: bool,
    /// How the underlying schema is inferred.
    pub schema: SchemaOptions,
}

impl Default for TypeScriptOptions {
    fn default() -> Self {
        Self {
            export: true,
            schema: SchemaOptions::default(),
        }
    }
}

impl TypeScriptOptions {
    pub fn export(mut self, value: bool) -> Self {
        self.export = value;
        self
    }

    pub fn schema(mut self, value: SchemaOptions) -> Self {
        self.schema = value;
        self
    }
}

/// Project a document's inferred schema to named TypeScript interfaces.
///
/// The root schema becomes `interface Name`; nested object schemas are
/// hoisted into their own interfaces named after the property path, and a
/// non-object root becomes a type alias instead.
///
/// ## Example
/// ```rust
/// use tessera_analyzer::{typescript_interface, TypeScriptOptions};
/// use tessera_parser::Parser;
///
/// let tree = Parser::new(r#"{"id": 1, "tags": ["a"]}"#).parse().unwrap();
/// let code = typescript_interface(&tree, "user", &TypeScriptOptions::default());
/// assert_eq!(code, "export interface User {\n  id: number;\n  tags: string[];\n}\n");
/// ```
pub fn typescript_interface(tree: &SyntaxTree, name: &str, options: &TypeScriptOptions) -> String {
    let schema = extract_schema(tree, &options.schema);
    let mut emitter = Emitter {
        export: options.export,
        output: String::new(),
        queue: VecDeque::new(),
    };
    emitter.queue.push_back((to_pascal_case(name), schema));
    emitter.run();
    emitter.output
}

struct Emitter {
    export: bool,
    output: String,
    queue: VecDeque<(String, Schema)>,
}

impl Emitter {
    fn run(&mut self) {
        let mut first = true;
        while let Some((name, schema)) = self.queue.pop_front() {
            if !first {
                self.output.push('\n');
            }
            first = false;
            match schema {
                Schema {
                    kind: SchemaKind::Object { properties },
                    ..
                } => self.emit_interface(&name, properties),
                other => {
                    let ty = self.type_of(&name, other);
                    self.emit_prefix();
                    self.output.push_str(&format!("type {name} = {ty};\n"));
                }
            }
        }
    }

    fn emit_prefix(&mut self) {
        if self.export {
            self.output.push_str("export ");
        }
    }

    fn emit_interface(
        &mut self,
        name: &str,
        properties: indexmap::IndexMap<String, Schema>,
    ) {
        self.emit_prefix();
        self.output.push_str(&format!("interface {name} {{\n"));
        for (field, schema) in properties {
            let context = format!("{name}{}", to_pascal_case(&field));
            let ty = self.type_of(&context, schema);
            self.output
                .push_str(&format!("  {}: {ty};\n", field_name(&field)));
        }
        self.output.push_str("}\n");
    }

    /// The TypeScript type for a schema; hoists nested object schemas into
    /// the queue under `context` as their interface name.
    fn type_of(&mut self, context: &str, schema: Schema) -> String {
        let nullable = schema.nullable;
        let base = match schema.kind {
            SchemaKind::String => "string".to_string(),
            SchemaKind::Number => "number".to_string(),
            SchemaKind::Boolean => "boolean".to_string(),
            SchemaKind::Null => "null".to_string(),
            SchemaKind::Any => "any".to_string(),
            SchemaKind::Object { .. } => {
                self.queue.push_back((context.to_string(), schema));
                return annotate(context.to_string(), nullable);
            }
            SchemaKind::Array { items } => match items {
                None => "any[]".to_string(),
                Some(item) => {
                    let item_ty = self.type_of(context, *item);
                    if item_ty.contains(' ') {
                        // Unions need parentheses under `[]`.
                        format!("({item_ty})[]")
                    } else {
                        format!("{item_ty}[]")
                    }
                }
            },
        };
        annotate(base, nullable)
    }
}

fn annotate(base: String, nullable: bool) -> String {
    if nullable && base != "null" && base != "any" {
        format!("{base} | null")
    } else {
        base
    }
}

/// Quote field names that are not valid TypeScript identifiers.
fn field_name(field: &str) -> String {
    let valid = !field.is_empty()
        && field
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if valid {
        field.to_string()
    } else {
        format!("{:?}", field)
    }
}

/// `user_profile` / `user-profile` / `user profile` to `UserProfile`.
pub(crate) fn to_pascal_case(name: &str) -> String {
    let mut output = String::with_capacity(name.len());
    let mut upper_next = true;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if upper_next {
                output.extend(c.to_uppercase());
            } else {
                output.push(c);
            }
            upper_next = false;
        } else {
            upper_next = true;
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::{to_pascal_case, typescript_interface, TypeScriptOptions};
    use expect_test::expect;
    use pretty_assertions::assert_eq;
    use tessera_parser::Parser;

    fn generate(source: &str, name: &str) -> String {
        let tree = Parser::new(source).parse().unwrap();
        typescript_interface(&tree, name, &TypeScriptOptions::default())
    }

    #[test]
    fn pascal_case() {
        assert_eq!(to_pascal_case("user"), "User");
        assert_eq!(to_pascal_case("user_profile"), "UserProfile");
        assert_eq!(to_pascal_case("api-response"), "ApiResponse");
        assert_eq!(to_pascal_case("alreadyPascal"), "AlreadyPascal");
    }

    #[test]
    fn flat_object() {
        let code = generate(r#"{"name": "Alice", "age": 30, "active": true}"#, "user");
        expect![[r#"
            export interface User {
              name: string;
              age: number;
              active: boolean;
            }
        "#]]
        .assert_eq(&code);
    }

    #[test]
    fn nested_objects_are_hoisted() {
        let code = generate(
            r#"{"name": "x", "address": {"city": "Oslo", "zip": "0150"}}"#,
            "user",
        );
        expect![[r#"
            export interface User {
              name: string;
              address: UserAddress;
            }

            export interface UserAddress {
              city: string;
              zip: string;
            }
        "#]]
        .assert_eq(&code);
    }

    #[test]
    fn arrays_of_objects() {
        let code = generate(r#"{"pets": [{"kind": "cat"}, {"kind": "dog"}]}"#, "owner");
        expect![[r#"
            export interface Owner {
              pets: OwnerPets[];
            }

            export interface OwnerPets {
              kind: string;
            }
        "#]]
        .assert_eq(&code);
    }

    #[test]
    fn nullable_fields_get_a_null_union() {
        let code = generate(r#"{"tags": ["a", null]}"#, "doc");
        expect![[r#"
            export interface Doc {
              tags: (string | null)[];
            }
        "#]]
        .assert_eq(&code);
    }

    #[test]
    fn non_object_root_is_a_type_alias() {
        let code = generate("[1, 2]", "scores");
        expect![[r#"
            export type Scores = number[];
        "#]]
        .assert_eq(&code);
    }

    #[test]
    fn weird_keys_are_quoted() {
        let code = generate(r#"{"weird-key": 1, "2nd": "x"}"#, "cfg");
        expect![[r#"
            export interface Cfg {
              "weird-key": number;
              "2nd": string;
            }
        "#]]
        .assert_eq(&code);
    }

    #[test]
    fn export_can_be_disabled() {
        let code = generate(r#"{"a": 1}"#, "thing");
        assert!(code.starts_with("export interface"));

        let tree = Parser::new(r#"{"a": 1}"#).parse().unwrap();
        let plain = typescript_interface(
            &tree,
            "thing",
            &TypeScriptOptions::default().export(false),
        );
        assert!(plain.starts_with("interface Thing"));
    }

    #[test]
    fn mixed_arrays_fall_back_to_any() {
        let code = generate(r#"{"data": [1, "two"]}"#, "payload");
        expect![[r#"
            export interface Payload {
              data: any[];
            }
        "#]]
        .assert_eq(&code);
    }
}
