#![doc = include_str!("../README.md")]

mod schema;
mod statistics;
mod typescript;

pub use crate::schema::{extract_schema, Schema, SchemaKind, SchemaOptions};
pub use crate::statistics::{statistics, Statistics};
pub use crate::typescript::{typescript_interface, TypeScriptOptions};
