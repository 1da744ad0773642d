/// Deepest nesting of frames and arrays that is walked recursively.
///
/// Name transcoding leaves deeper values as they are, and `Display` elides
/// them.
pub const MAX_NESTING: usize = 128;

/// Character encoding used for field names on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameEncoding {
    /// Names are written as UTF-8 bytes.
    #[default]
    Utf8,
    /// Names are written as 7-bit ASCII; other characters become `?`.
    Ascii,
}

impl NameEncoding {
    pub(crate) fn encode(self, name: &str) -> Vec<u8> {
        match self {
            NameEncoding::Utf8 => name.as_bytes().to_vec(),
            NameEncoding::Ascii => name
                .chars()
                .map(|ch| if ch.is_ascii() { ch as u8 } else { b'?' })
                .collect(),
        }
    }

    /// `None` when the bytes are not valid in this encoding. ASCII decoding
    /// never fails; non-ASCII bytes become `?`.
    pub(crate) fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            NameEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            NameEncoding::Ascii => Some(
                bytes
                    .iter()
                    .map(|&b| if b.is_ascii() { b as char } else { '?' })
                    .collect(),
            ),
        }
    }
}

/// Controls wire-level encoding details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Encoding applied to field names.
    pub name_encoding: NameEncoding,
    /// Maximum number of bytes rendered by diagnostic dumps.
    pub dump_limit: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            name_encoding: NameEncoding::Utf8,
            dump_limit: 256,
        }
    }
}
