//! Self-describing binary encoding of named, typed field sequences.
//!
//! A [`DataFrame`] is an ordered list of [`DataField`]s. Each field travels as
//! a name/type/value triplet:
//! - A 1-byte name length followed by the name bytes (0 means unnamed)
//! - A 1-byte type code (0-17, see [`FieldType`])
//! - The value: fixed-width types write their bytes directly, variable types
//!   write a 4-byte big-endian length first
//!
//! Frames nest through the FRAME type, so a document is a tree. All numerics
//! are big-endian; floats travel as raw IEEE-754 bits.

pub mod byteutil;
pub mod config;
pub mod error;
pub mod field;
pub mod flatten;
pub mod frame;
pub mod frameset;
pub mod registry;
pub mod shared;
pub mod types;
pub mod value;

pub use config::{CodecConfig, NameEncoding, MAX_NESTING};
pub use error::{CodecError, DecodeError, DecodeErrorKind, Result};
pub use field::{DataField, MAX_NAME_LEN};
pub use flatten::flatten;
pub use frame::DataFrame;
pub use frameset::FrameSet;
pub use registry::TypeRegistry;
pub use shared::SharedFrame;
pub use types::{FieldType, FieldTypeHandler};
pub use value::{Value, DATE_FORMAT};
