/// Smallest internal character buffer the parser will use.
pub const MIN_BUFFER_SIZE: usize = 10;

/// Default internal character buffer size.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Default limit on nested arrays and objects.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Controls JSON parsing behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Characters pulled from the source per refill. Clamped to at least
    /// [`MIN_BUFFER_SIZE`].
    pub buffer_size: usize,
    /// When true, a missing value before `,` or `]` yields a null field, so
    /// `[5,]` parses as `[5,null]` and `[5,,2]` as `[5,null,2]`.
    pub lenient_commas: bool,
    /// Deepest nesting of arrays and objects accepted; the root counts as 1.
    pub max_depth: usize,
}

impl ParserConfig {
    /// Reject missing values instead of materializing nulls.
    pub fn strict() -> Self {
        Self {
            lenient_commas: false,
            ..Self::default()
        }
    }

    /// Buffer sized to a text of `len` characters.
    pub(crate) fn for_text_len(len: usize) -> Self {
        Self {
            buffer_size: len.clamp(MIN_BUFFER_SIZE, DEFAULT_BUFFER_SIZE),
            ..Self::default()
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            lenient_commas: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Output layout of the JSON writer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriterConfig {
    /// No whitespace between tokens.
    #[default]
    Minimal,
    /// Two-space indentation with one member or element per line.
    Formatted,
}
