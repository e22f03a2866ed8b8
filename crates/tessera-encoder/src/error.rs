/// Errors produced while encoding.
///
/// The formatter only fails on options that contradict the output mode and
/// on internal invariants of the streaming entry point; a well-formed tree
/// always formats.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum EncodeError {
    /// An option was set that only makes sense for JSON5 output.
    #[error("{0} is only valid for JSON5 output")]
    OptionsConflict(&'static str),
    /// The streaming formatter finished with open containers, or saw a
    /// close delimiter with none open.
    #[error("unbalanced delimiters while streaming")]
    UnbalancedDelimiters,
    /// The streaming formatter's fixed depth table overflowed.
    #[error("maximum streaming depth of {max} exceeded")]
    DepthExceeded { max: usize },
    /// `format_source` could not parse its input.
    #[error(transparent)]
    Parse(#[from] tessera_parser::Error),
}
