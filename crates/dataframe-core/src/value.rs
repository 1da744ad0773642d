use std::fmt;

use chrono::{DateTime, Utc};
use url::Url;

use crate::byteutil::bytes_to_hex;
use crate::frame::DataFrame;
use crate::types::FieldType;

/// Rendering used for DATE values in string form.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// A native value that can be carried by a field.
///
/// Each variant corresponds to exactly one wire type; [`Value::field_type`]
/// gives the mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Frame(DataFrame),
    Null,
    Bytes(Vec<u8>),
    String(String),
    S8(i8),
    U8(u8),
    S16(i16),
    U16(u16),
    S32(i32),
    U32(u32),
    S64(i64),
    U64(u64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
    Uri(Url),
    Array(Vec<Value>),
}

impl Value {
    /// Wire type this value encodes as.
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::Frame(_) => FieldType::Frame,
            Value::Null => FieldType::Undefined,
            Value::Bytes(_) => FieldType::ByteArray,
            Value::String(_) => FieldType::String,
            Value::S8(_) => FieldType::S8,
            Value::U8(_) => FieldType::U8,
            Value::S16(_) => FieldType::S16,
            Value::U16(_) => FieldType::U16,
            Value::S32(_) => FieldType::S32,
            Value::U32(_) => FieldType::U32,
            Value::S64(_) => FieldType::S64,
            Value::U64(_) => FieldType::U64,
            Value::Float(_) => FieldType::Float,
            Value::Double(_) => FieldType::Double,
            Value::Boolean(_) => FieldType::Boolean,
            Value::Date(_) => FieldType::Date,
            Value::Uri(_) => FieldType::Uri,
            Value::Array(_) => FieldType::Array,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        self.field_type().type_name()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_frame(&self) -> Option<&DataFrame> {
        match self {
            Value::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn into_frame(self) -> Option<DataFrame> {
        match self {
            Value::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer view of any integral variant that fits in an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::S8(v) => Some(i64::from(v)),
            Value::U8(v) => Some(i64::from(v)),
            Value::S16(v) => Some(i64::from(v)),
            Value::U16(v) => Some(i64::from(v)),
            Value::S32(v) => Some(i64::from(v)),
            Value::U32(v) => Some(i64::from(v)),
            Value::S64(v) => Some(v),
            Value::U64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float(v) => Some(f64::from(v)),
            Value::Double(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Frame(frame) => write!(f, "{frame}"),
            Value::Null => Ok(()),
            Value::Bytes(bytes) => f.write_str(&bytes_to_hex(bytes)),
            Value::String(text) => f.write_str(text),
            Value::S8(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v}"),
            Value::S16(v) => write!(f, "{v}"),
            Value::U16(v) => write!(f, "{v}"),
            Value::S32(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::S64(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            Value::Uri(uri) => f.write_str(uri.as_str()),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! value_from {
    ($($native:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$native> for Value {
                fn from(value: $native) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

value_from! {
    DataFrame => Frame,
    Vec<u8> => Bytes,
    String => String,
    i8 => S8,
    u8 => U8,
    i16 => S16,
    u16 => U16,
    i32 => S32,
    u32 => U32,
    i64 => S64,
    u64 => U64,
    f32 => Float,
    f64 => Double,
    bool => Boolean,
    DateTime<Utc> => Date,
    Url => Uri,
    Vec<Value> => Array,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
