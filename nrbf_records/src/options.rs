/// Limits and strictness knobs for parsing one stream.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Maximum nesting of records defined inline inside other records.
    pub max_depth: usize,
    /// Maximum element count of any single array, including multi-dimensional ones.
    pub max_array_elements: usize,
    /// Maximum element count summed over all arrays of the stream.
    /// A null run costs a few bytes on the wire but one slot per element in memory.
    pub max_total_elements: usize,
    /// Whether a stream must end with a `MessageEnd` record,
    /// rather than merely being exhausted at a record boundary.
    pub require_message_end: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_array_elements: 1 << 20,
            max_total_elements: 1 << 22,
            require_message_end: false,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
    pub fn with_max_array_elements(mut self, max_array_elements: usize) -> Self {
        self.max_array_elements = max_array_elements;
        self
    }
    pub fn with_max_total_elements(mut self, max_total_elements: usize) -> Self {
        self.max_total_elements = max_total_elements;
        self
    }
    pub fn with_require_message_end(mut self, require_message_end: bool) -> Self {
        self.require_message_end = require_message_end;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
    pub fn max_array_elements(&self) -> usize {
        self.max_array_elements
    }
    pub fn max_total_elements(&self) -> usize {
        self.max_total_elements
    }
    pub fn is_require_message_end(&self) -> bool {
        self.require_message_end
    }
}
