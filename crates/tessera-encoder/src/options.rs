use crate::error::EncodeError;

/// What to indent with in multiline layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentStyle {
    #[default]
    Space,
    Tab,
}

/// Which quote character strings are emitted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    #[default]
    Double,
    /// JSON5 output only.
    Single,
    /// Keep whatever quote each string used in the source.
    Preserve,
}

/// Options controlling formatting.
///
/// The defaults produce conventional two-space multiline output that is
/// strict RFC 8259. All fields have chainable setters:
///
/// ```rust
/// use tessera_encoder::FormatOptions;
///
/// let options = FormatOptions::default().indent_size(4).sort_keys(true);
/// assert_eq!(options.indent_size, 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FormatOptions {
    pub indent_size: u32,
    pub indent_style: IndentStyle,
    /// Soft limit used for compact-vs-multiline layout decisions.
    pub line_width: u32,
    /// Allow single-line emission of small objects.
    pub compact_objects: bool,
    /// Allow single-line emission of small arrays.
    pub compact_arrays: bool,
    /// Emit everything on one line, overriding the heuristic.
    pub force_compact: bool,
    /// Emit every container multiline, overriding the heuristic.
    pub force_multiline: bool,
    /// Emit object properties in lexicographic order of their decoded keys.
    pub sort_keys: bool,
    /// Emit trailing commas in multiline containers (JSON5 output only).
    pub trailing_comma: bool,
    /// Compact layouts only; multiline layouts always space after `:`.
    pub space_after_colon: bool,
    /// Compact layouts only.
    pub space_after_comma: bool,
    pub quote_style: QuoteStyle,
    /// Mark the output as JSON5, which legalizes `trailing_comma` and
    /// `QuoteStyle::Single`.
    pub json5: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_size: 2,
            indent_style: IndentStyle::Space,
            line_width: 80,
            compact_objects: false,
            compact_arrays: false,
            force_compact: false,
            force_multiline: false,
            sort_keys: false,
            trailing_comma: false,
            space_after_colon: false,
            space_after_comma: false,
            quote_style: QuoteStyle::Double,
            json5: false,
        }
    }
}

impl FormatOptions {
    pub fn indent_size(mut self, value: u32) -> Self {
        self.indent_size = value;
        self
    }

    pub fn indent_style(mut self, value: IndentStyle) -> Self {
        self.indent_style = value;
        self
    }

    pub fn line_width(mut self, value: u32) -> Self {
        self.line_width = value;
        self
    }

    pub fn compact_objects(mut self, value: bool) -> Self {
        self.compact_objects = value;
        self
    }

    pub fn compact_arrays(mut self, value: bool) -> Self {
        self.compact_arrays = value;
        self
    }

    pub fn force_compact(mut self, value: bool) -> Self {
        self.force_compact = value;
        self
    }

    pub fn force_multiline(mut self, value: bool) -> Self {
        self.force_multiline = value;
        self
    }

    pub fn sort_keys(mut self, value: bool) -> Self {
        self.sort_keys = value;
        self
    }

    pub fn trailing_comma(mut self, value: bool) -> Self {
        self.trailing_comma = value;
        self
    }

    pub fn space_after_colon(mut self, value: bool) -> Self {
        self.space_after_colon = value;
        self
    }

    pub fn space_after_comma(mut self, value: bool) -> Self {
        self.space_after_comma = value;
        self
    }

    pub fn quote_style(mut self, value: QuoteStyle) -> Self {
        self.quote_style = value;
        self
    }

    pub fn json5(mut self, value: bool) -> Self {
        self.json5 = value;
        self
    }

    /// Reject option combinations that would produce output the declared
    /// mode cannot represent.
    pub(crate) fn validate(&self) -> Result<(), EncodeError> {
        if !self.json5 {
            if self.quote_style == QuoteStyle::Single {
                return Err(EncodeError::OptionsConflict("QuoteStyle::Single"));
            }
            if self.trailing_comma {
                return Err(EncodeError::OptionsConflict("trailing_comma"));
            }
        }
        Ok(())
    }

    /// One indentation unit.
    pub(crate) fn indent_unit(&self) -> String {
        match self.indent_style {
            IndentStyle::Space => " ".repeat(self.indent_size as usize),
            IndentStyle::Tab => "\t".repeat(self.indent_size as usize),
        }
    }
}
