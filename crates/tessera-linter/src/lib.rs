#![doc = include_str!("../README.md")]

mod diagnostic;
mod lint;
mod options;
mod report;
mod rules;

pub use crate::diagnostic::{apply_edits, Diagnostic, Edit, Fix};
pub use crate::lint::lint;
pub use crate::options::LintOptions;
pub use crate::report::DiagnosticReport;
pub use crate::rules::{RuleId, RuleSet, Severity, UnknownRule};
