#![doc = include_str!("../README.md")]

mod error;
mod escape;
mod format;
mod options;
mod stream;

pub use crate::error::EncodeError;
pub use crate::format::{format, format_source, format_source_with};
pub use crate::options::{FormatOptions, IndentStyle, QuoteStyle};
pub use crate::stream::{StreamFormatter, MAX_STREAM_DEPTH};
