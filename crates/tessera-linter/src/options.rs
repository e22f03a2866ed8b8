/// Bounds read by the depth, precision, and size rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LintOptions {
    /// Hard nesting maximum for `max_depth_exceeded`.
    pub max_depth: usize,
    /// Soft nesting threshold for `deep_nesting`.
    pub deep_nesting_threshold: usize,
    /// Maximum fractional digits for `large_number_precision`.
    pub max_number_precision: usize,
    /// Maximum decoded string length in bytes for `large_structure`.
    pub max_string_length: usize,
    /// Maximum property count per object for `large_structure`.
    pub max_object_keys: usize,
    /// Maximum element count per array for `large_structure`.
    pub max_array_elements: usize,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            max_depth: 100,
            deep_nesting_threshold: 20,
            max_number_precision: 15,
            max_string_length: 10_000,
            max_object_keys: 1_000,
            max_array_elements: 10_000,
        }
    }
}

impl LintOptions {
    pub fn max_depth(mut self, value: usize) -> Self {
        self.max_depth = value;
        self
    }

    pub fn deep_nesting_threshold(mut self, value: usize) -> Self {
        self.deep_nesting_threshold = value;
        self
    }

    pub fn max_number_precision(mut self, value: usize) -> Self {
        self.max_number_precision = value;
        self
    }

    pub fn max_string_length(mut self, value: usize) -> Self {
        self.max_string_length = value;
        self
    }

    pub fn max_object_keys(mut self, value: usize) -> Self {
        self.max_object_keys = value;
        self
    }

    pub fn max_array_elements(mut self, value: usize) -> Self {
        self.max_array_elements = value;
        self
    }
}
