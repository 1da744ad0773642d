use dataframe_core::CodecError;

/// Malformed JSON text, located by character position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub message: String,
    /// Zero-based character offset of the offending character.
    pub offset: usize,
    /// One-based line number.
    pub line: usize,
    /// One-based column number.
    pub column: usize,
    /// The offending character, `None` at end of input.
    pub character: Option<char>,
}

/// Errors that can occur while converting between JSON and frames.
#[derive(Debug, thiserror::Error)]
pub enum JsonError {
    /// The JSON text is malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A frame could not be built from otherwise valid JSON.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Wraps any failure of [`marshal`](crate::marshal).
    #[error("could not marshal JSON to DataFrame: {message}")]
    Marshal {
        message: String,
        #[source]
        source: Box<JsonError>,
    },
}

impl JsonError {
    pub(crate) fn marshal(source: JsonError) -> Self {
        JsonError::Marshal {
            message: source.to_string(),
            source: Box::new(source),
        }
    }

    /// Position of the underlying parse failure, if any.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            JsonError::Parse(err) => Some(err),
            JsonError::Marshal { source, .. } => source.parse_error(),
            JsonError::Codec(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, JsonError>;
