use std::fmt;

use crate::field::DataField;

/// Errors that can occur while building, encoding or decoding frames.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The type code is not registered.
    #[error("unsupported data type code {code}")]
    UnsupportedType { code: u8 },

    /// No registered handler accepts the value.
    #[error("unsupported value kind: {0}")]
    UnsupportedValue(&'static str),

    /// A handler was asked to encode a value it does not accept.
    #[error("encode failed: {0}")]
    Encode(String),

    /// Field or frame bytes could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A caller violated an argument contract (e.g. name too long).
    #[error("invalid argument: {0}")]
    Argument(String),

    /// A field index was outside the frame.
    #[error("field index {index} out of range (frame has {len} fields)")]
    IndexOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, CodecError>;

/// Broad classification of a decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// The buffer ended before the field was complete.
    Underflow,
    /// The type code octet is not registered.
    UnknownType,
    /// A variable-length prefix does not fit the remaining buffer.
    BadLength,
    /// The value bytes are invalid for their type.
    Malformed,
}

/// A decode failure with enough stream context to locate the failing field.
///
/// `position` is the absolute offset where the failing field started and
/// `previous` the offset of the last field that decoded cleanly. Both are only
/// known once the error has passed through [`DataFrame::from_bytes`].
///
/// [`DataFrame::from_bytes`]: crate::DataFrame::from_bytes
#[derive(Debug, Clone, thiserror::Error)]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    pub message: String,
    pub position: usize,
    pub previous: Option<usize>,
    pub field_index: Option<usize>,
    pub last_field: Option<Box<DataField>>,
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            position: 0,
            previous: None,
            field_index: None,
            last_field: None,
        }
    }

    pub fn underflow(message: impl Into<String>) -> Self {
        Self::new(DecodeErrorKind::Underflow, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(DecodeErrorKind::Malformed, message)
    }

    /// Attach frame-level context to a field decode failure.
    ///
    /// Errors that already carry a field index came from a nested frame and
    /// keep their index and last field; only the message gains a `DF:` prefix.
    pub(crate) fn within_frame(
        mut self,
        position: usize,
        previous: usize,
        field_index: usize,
        last_field: Option<&DataField>,
    ) -> Self {
        if self.field_index.is_some() {
            self.message = format!("DF:{}", self.message);
        } else {
            let context = match self.kind {
                DecodeErrorKind::Underflow => "data underflow adding field",
                _ => "problems decoding field",
            };
            self.message = format!("{context}: {}", self.message);
            self.field_index = Some(field_index);
            self.last_field = last_field.map(|field| Box::new(field.clone()));
        }
        self.position = position;
        self.previous = Some(previous);
        self
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decode error: {}", self.message)?;
        if let Some(index) = self.field_index {
            write!(f, " (field {index} at offset {}", self.position)?;
            if let Some(previous) = self.previous {
                write!(f, ", previous field at offset {previous}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
