//! JSON text to and from [`DataFrame`](dataframe_core::DataFrame)s.
//!
//! Objects become frames of named fields, arrays become frames of unnamed
//! fields. Scalars map onto the smallest faithful field type:
//! - strings to STRING, `true`/`false` to BOOLEAN, `null` to UNDEFINED
//! - integers to S64, numbers with a fraction or exponent to DOUBLE
//!
//! The parser streams characters through a fixed buffer and reports errors
//! by offset, line and column.

pub mod config;
pub mod error;
pub mod marshal;
pub mod parser;
pub mod writer;

pub use config::{
    ParserConfig, WriterConfig, DEFAULT_BUFFER_SIZE, DEFAULT_MAX_DEPTH, MIN_BUFFER_SIZE,
};
pub use error::{JsonError, ParseError, Result};
pub use marshal::{marshal, marshal_frame, to_formatted_string};
pub use parser::JsonFrameParser;
pub use writer::{escape_into, JsonWriter};
