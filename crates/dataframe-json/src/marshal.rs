use dataframe_core::DataFrame;

use crate::config::WriterConfig;
use crate::error::{JsonError, Result};
use crate::parser::JsonFrameParser;
use crate::writer::JsonWriter;

/// Parse JSON text into frames, one per root object or array.
///
/// Any failure is wrapped in [`JsonError::Marshal`]; the position of a
/// syntax error stays reachable through [`JsonError::parse_error`].
pub fn marshal(text: &str) -> Result<Vec<DataFrame>> {
    JsonFrameParser::from_text(text)
        .parse()
        .map_err(JsonError::marshal)
}

/// Render a frame as JSON with no whitespace.
pub fn marshal_frame(frame: &DataFrame) -> String {
    JsonWriter::new(WriterConfig::Minimal).write(frame)
}

/// Render a frame as indented, multi-line JSON.
pub fn to_formatted_string(frame: &DataFrame) -> String {
    JsonWriter::new(WriterConfig::Formatted).write(frame)
}
