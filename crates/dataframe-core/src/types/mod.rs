//! Wire type codes and the per-type encode/decode handlers.
//!
//! Codes 0-17 are part of the wire format and must never be renumbered.

pub(crate) mod array;
mod frame;
mod numeric;
mod scalar;
mod text;

use std::fmt;

use crate::error::{CodecError, Result};
use crate::value::Value;

pub use array::ArrayType;
pub use frame::{FrameType, UndefinedType};
pub use numeric::{
    DoubleType, FloatType, S16Type, S32Type, S64Type, S8Type, U16Type, U32Type, U64Type, U8Type,
};
pub use scalar::{BooleanType, DateType};
pub use text::{ByteArrayType, StringType, UriType};

/// Numeric type code of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum FieldType {
    Frame = 0,
    Undefined = 1,
    ByteArray = 2,
    String = 3,
    S8 = 4,
    U8 = 5,
    S16 = 6,
    U16 = 7,
    S32 = 8,
    U32 = 9,
    S64 = 10,
    U64 = 11,
    Float = 12,
    Double = 13,
    Boolean = 14,
    Date = 15,
    Uri = 16,
    Array = 17,
}

impl FieldType {
    /// Every type in code order.
    pub const ALL: [FieldType; 18] = [
        FieldType::Frame,
        FieldType::Undefined,
        FieldType::ByteArray,
        FieldType::String,
        FieldType::S8,
        FieldType::U8,
        FieldType::S16,
        FieldType::U16,
        FieldType::S32,
        FieldType::U32,
        FieldType::S64,
        FieldType::U64,
        FieldType::Float,
        FieldType::Double,
        FieldType::Boolean,
        FieldType::Date,
        FieldType::Uri,
        FieldType::Array,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Short mnemonic, e.g. `S32` or `STR`.
    pub fn type_name(self) -> &'static str {
        match self {
            FieldType::Frame => "FRM",
            FieldType::Undefined => "UDEF",
            FieldType::ByteArray => "BYTE",
            FieldType::String => "STR",
            FieldType::S8 => "S8",
            FieldType::U8 => "U8",
            FieldType::S16 => "S16",
            FieldType::U16 => "U16",
            FieldType::S32 => "S32",
            FieldType::U32 => "U32",
            FieldType::S64 => "S64",
            FieldType::U64 => "U64",
            FieldType::Float => "FLT",
            FieldType::Double => "DBL",
            FieldType::Boolean => "BOL",
            FieldType::Date => "DAT",
            FieldType::Uri => "URI",
            FieldType::Array => "ARY",
        }
    }

    /// Look a type up by its mnemonic.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.type_name() == name)
    }
}

impl TryFrom<u8> for FieldType {
    type Error = CodecError;

    fn try_from(code: u8) -> Result<Self> {
        Self::ALL
            .get(usize::from(code))
            .copied()
            .ok_or(CodecError::UnsupportedType { code })
    }
}

impl From<FieldType> for u8 {
    fn from(ty: FieldType) -> Self {
        ty.code()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Encode/decode strategy for one wire type.
pub trait FieldTypeHandler: Send + Sync {
    /// The type code this handler serves.
    fn field_type(&self) -> FieldType;

    /// Fixed value width in bytes, or `None` for length-prefixed values.
    fn size(&self) -> Option<usize>;

    fn is_numeric(&self) -> bool {
        false
    }

    fn type_name(&self) -> &'static str {
        self.field_type().type_name()
    }

    /// True if `value` can be encoded by this handler.
    fn accepts(&self, value: &Value) -> bool;

    fn encode(&self, value: &Value) -> Result<Vec<u8>>;

    fn decode(&self, bytes: &[u8]) -> Result<Value>;

    /// Human-readable rendering of encoded bytes; empty bytes render empty.
    fn string_value(&self, bytes: &[u8]) -> String {
        if bytes.is_empty() {
            return String::new();
        }
        self.decode(bytes)
            .map(|value| value.to_string())
            .unwrap_or_default()
    }
}

pub(crate) fn mismatch(handler: &dyn FieldTypeHandler, value: &Value) -> CodecError {
    CodecError::Encode(format!(
        "{} handler cannot encode a {} value",
        handler.type_name(),
        value.kind()
    ))
}

/// Check that fixed-width value bytes have exactly the expected length.
pub(crate) fn expect_len(handler: &dyn FieldTypeHandler, bytes: &[u8], len: usize) -> Result<()> {
    if bytes.len() == len {
        Ok(())
    } else {
        Err(crate::error::DecodeError::malformed(format!(
            "{} value must be {len} bytes, got {}",
            handler.type_name(),
            bytes.len()
        ))
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        for (index, ty) in FieldType::ALL.iter().enumerate() {
            assert_eq!(usize::from(ty.code()), index);
            assert_eq!(FieldType::try_from(ty.code()).unwrap(), *ty);
        }
        assert_eq!(FieldType::S32.code(), 8);
        assert_eq!(FieldType::Array.code(), 17);
    }

    #[test]
    fn unknown_code_is_unsupported() {
        assert!(matches!(
            FieldType::try_from(18),
            Err(CodecError::UnsupportedType { code: 18 })
        ));
    }

    #[test]
    fn mnemonic_lookup() {
        assert_eq!(FieldType::from_name("DBL"), Some(FieldType::Double));
        assert_eq!(FieldType::from_name("STR"), Some(FieldType::String));
        assert_eq!(FieldType::from_name("nope"), None);
        assert_eq!(FieldType::Uri.to_string(), "URI");
    }
}
