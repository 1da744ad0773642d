//! Self-describing binary frames of named, typed fields.
//!
//! A frame is an ordered sequence of fields encoded as name/type/value
//! triplets. Frames nest, so one frame can carry a whole document, and any
//! frame converts to and from JSON text.
//!
//! # Crate Structure
//!
//! - [`core`]: binary codec, field types, frames and frame utilities
//! - [`json`]: JSON parser and writer

/// Re-export codec types.
pub mod core {
    pub use dataframe_core::*;
}

/// Re-export JSON conversion.
pub mod json {
    pub use dataframe_json::*;
}

pub use dataframe_core::{CodecError, DataField, DataFrame, FieldType, Value};
pub use dataframe_json::{marshal, marshal_frame, to_formatted_string, JsonError};
