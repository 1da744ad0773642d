use std::borrow::Cow;
use std::fmt;

use bytes::{Buf, BufMut};

use crate::byteutil::bytes_to_hex;
use crate::config::{CodecConfig, NameEncoding, MAX_NESTING};
use crate::error::{CodecError, DecodeError, DecodeErrorKind, Result};
use crate::frame::DataFrame;
use crate::registry::TypeRegistry;
use crate::types::array::transcode_elements;
use crate::types::{FieldType, FieldTypeHandler};
use crate::value::Value;

/// Longest field name, in encoded bytes.
pub const MAX_NAME_LEN: usize = 255;

/// Bytes of value shown by the `Display` impl before truncating.
const DISPLAY_SAMPLE: usize = 32;

/// One named or unnamed typed value in a frame.
///
/// Wire format:
/// ```text
/// ┌──────────┬────────────┬──────┬──────────────────────┬─────────────┐
/// │ name len │ name bytes │ type │ value len (4B BE)    │ value bytes │
/// │ (1B)     │ (0-255B)   │ (1B) │ variable types only  │             │
/// └──────────┴────────────┴──────┴──────────────────────┴─────────────┘
/// ```
///
/// The value is kept in encoded form. A field with no value bytes at all is
/// null; an empty value is null too unless the field is a FRAME, where it
/// means an empty frame. Nested names are always held UTF-8 encoded.
///
/// Fields compare by their wire encoding: a null field equals the field its
/// encoding decodes back to.
#[derive(Debug, Clone)]
pub struct DataField {
    name: Option<String>,
    field_type: FieldType,
    value: Option<Vec<u8>>,
}

impl DataField {
    /// Build a field from a native value, inferring its type.
    pub fn new(name: Option<&str>, value: impl Into<Value>) -> Result<Self> {
        let value = value.into();
        let field_type = TypeRegistry::global().type_for(&value)?;
        Self::with_type(name, field_type, value)
    }

    /// Build a field of a forced type.
    ///
    /// A null value is allowed for every type and leaves the field without
    /// value bytes.
    pub fn with_type(
        name: Option<&str>,
        field_type: FieldType,
        value: impl Into<Value>,
    ) -> Result<Self> {
        let name = checked_name(name)?;
        let value = value.into();
        let bytes = if value.is_null() {
            None
        } else {
            Some(handler(field_type)?.encode(&value)?)
        };
        Self::assemble(name, field_type, bytes)
    }

    /// Build a field from already-encoded value bytes.
    pub fn from_raw(
        name: Option<&str>,
        field_type: FieldType,
        value: Option<Vec<u8>>,
    ) -> Result<Self> {
        Self::assemble(checked_name(name)?, field_type, value)
    }

    fn assemble(
        name: Option<String>,
        field_type: FieldType,
        value: Option<Vec<u8>>,
    ) -> Result<Self> {
        if let Some(bytes) = &value {
            match handler(field_type)?.size() {
                Some(size) if bytes.len() != size => {
                    return Err(CodecError::Argument(format!(
                        "{} value must be {size} bytes, got {}",
                        field_type,
                        bytes.len()
                    )));
                }
                None if u32::try_from(bytes.len()).is_err() => {
                    return Err(CodecError::Argument(format!(
                        "{} value of {} bytes exceeds the 4-byte length prefix",
                        field_type,
                        bytes.len()
                    )));
                }
                _ => {}
            }
        }
        Ok(Self {
            name,
            field_type,
            value,
        })
    }

    /// Read one field from the front of `buf` using the default codec config.
    pub fn decode_from<B: Buf>(buf: &mut B) -> Result<Self> {
        Self::decode_from_with(buf, &CodecConfig::default())
    }

    /// Read one field from the front of `buf`.
    ///
    /// Names that are not valid in the configured encoding fail with a
    /// `Malformed` decode error. On error the buffer position is unspecified.
    pub fn decode_from_with<B: Buf>(buf: &mut B, config: &CodecConfig) -> Result<Self> {
        let mut field = Self::read_shallow(buf, config)?;
        if config.name_encoding != NameEncoding::Utf8 {
            let value = field.value.as_deref().unwrap_or_default();
            if let Some(canonical) =
                transcode(field.field_type, value, config, &CodecConfig::default(), 0)
            {
                field.value = Some(canonical);
            }
        }
        Ok(field)
    }

    /// Decode one field without touching the names inside its value.
    fn read_shallow<B: Buf>(buf: &mut B, config: &CodecConfig) -> Result<Self> {
        let name_len = usize::from(read_u8(buf, "name length")?);
        let name = if name_len > 0 {
            ensure(buf, name_len, "name")?;
            let mut raw = vec![0u8; name_len];
            buf.copy_to_slice(&mut raw);
            let name = config.name_encoding.decode(&raw).ok_or_else(|| {
                DecodeError::malformed(format!(
                    "field name is not valid {:?}: {}",
                    config.name_encoding,
                    bytes_to_hex(&raw)
                ))
            })?;
            Some(name)
        } else {
            None
        };

        let code = read_u8(buf, "type code")?;
        let field_type = FieldType::try_from(code).map_err(|_| {
            DecodeError::new(
                DecodeErrorKind::UnknownType,
                format!("unsupported data type code {code}"),
            )
        })?;

        let len = match handler(field_type)?.size() {
            Some(size) => size,
            None => {
                ensure(buf, 4, "value length")?;
                let len = buf.get_u32();
                if len > i32::MAX as u32 {
                    return Err(DecodeError::new(
                        DecodeErrorKind::BadLength,
                        format!("corrupt value length {len:#010X}"),
                    )
                    .into());
                }
                len as usize
            }
        };

        ensure(buf, len, "value")?;
        let mut value = vec![0u8; len];
        buf.copy_to_slice(&mut value);

        Ok(Self {
            name,
            field_type,
            value: Some(value),
        })
    }

    /// Append the wire encoding using the default codec config.
    pub fn write_to<B: BufMut>(&self, dst: &mut B) {
        self.write_to_with(dst, &CodecConfig::default());
    }

    /// Append the wire encoding of this field to `dst`.
    ///
    /// A field without value bytes writes a zero-filled placeholder for fixed
    /// types and a zero length for variable ones.
    pub fn write_to_with<B: BufMut>(&self, dst: &mut B, config: &CodecConfig) {
        let value = self.value.as_deref().unwrap_or_default();
        let transcoded = if config.name_encoding == NameEncoding::Utf8 {
            None
        } else {
            transcode(self.field_type, value, &CodecConfig::default(), config, 0)
        };
        self.write_parts(dst, config, transcoded.as_deref().unwrap_or(value));
    }

    fn write_parts<B: BufMut>(&self, dst: &mut B, config: &CodecConfig, value: &[u8]) {
        match &self.name {
            Some(name) => {
                // never longer than the UTF-8 form, which is at most MAX_NAME_LEN
                let encoded = config.name_encoding.encode(name);
                dst.put_u8(encoded.len() as u8);
                dst.put_slice(&encoded);
            }
            None => dst.put_u8(0),
        }

        dst.put_u8(self.field_type.code());

        match self.size() {
            Some(size) => {
                dst.put_slice(value);
                dst.put_bytes(0, size.saturating_sub(value.len()));
            }
            None => {
                dst.put_u32(value.len() as u32);
                dst.put_slice(value);
            }
        }
    }

    /// The complete TLV encoding of this field.
    pub fn wire_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_to(&mut out);
        out
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Rename the field. Fails if the name is longer than 255 bytes.
    pub fn set_name(&mut self, name: Option<&str>) -> Result<()> {
        self.name = checked_name(name)?;
        Ok(())
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn type_code(&self) -> u8 {
        self.field_type.code()
    }

    pub fn type_name(&self) -> &'static str {
        self.field_type.type_name()
    }

    /// Encoded value bytes, `None` when the field was built from a null value.
    pub fn value(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }

    /// Length of the encoded value.
    pub fn len(&self) -> usize {
        self.value.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_null(&self) -> bool {
        match &self.value {
            None => true,
            Some(bytes) => bytes.is_empty() && self.field_type != FieldType::Frame,
        }
    }

    pub fn is_frame(&self) -> bool {
        self.field_type == FieldType::Frame
    }

    pub fn is_undefined(&self) -> bool {
        self.field_type == FieldType::Undefined
    }

    pub fn is_numeric(&self) -> bool {
        handler(self.field_type).is_ok_and(|handler| handler.is_numeric())
    }

    /// Decode the value into its native form.
    ///
    /// Null fields give [`Value::Null`]; an empty FRAME value gives an empty
    /// frame.
    pub fn object_value(&self) -> Result<Value> {
        match self.value.as_deref() {
            None => Ok(Value::Null),
            Some([]) if self.is_frame() => Ok(Value::Frame(DataFrame::new())),
            Some([]) => Ok(Value::Null),
            Some(bytes) => handler(self.field_type)?.decode(bytes),
        }
    }

    /// Human-readable form of the value; empty for null fields.
    pub fn string_value(&self) -> String {
        match (self.value.as_deref(), handler(self.field_type)) {
            (Some(bytes), Ok(handler)) => handler.string_value(bytes),
            _ => String::new(),
        }
    }

    /// Mnemonics of all type codes, in code order.
    pub fn type_names() -> Vec<&'static str> {
        TypeRegistry::global().type_names()
    }

    fn size(&self) -> Option<usize> {
        handler(self.field_type).ok().and_then(|handler| handler.size())
    }

    /// Value bytes exactly as written to the wire.
    fn wire_value(&self) -> Cow<'_, [u8]> {
        match (self.value.as_deref(), self.size()) {
            (Some(bytes), _) => Cow::Borrowed(bytes),
            (None, Some(size)) => Cow::Owned(vec![0; size]),
            (None, None) => Cow::Borrowed(&[]),
        }
    }
}

impl PartialEq for DataField {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.field_type == other.field_type
            && self.wire_value() == other.wire_value()
    }
}

impl Eq for DataField {}

impl fmt::Display for DataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DataField: name='{}' type={}({})",
            self.name.as_deref().unwrap_or_default(),
            self.type_name(),
            self.type_code()
        )?;
        let value = self.value.as_deref().unwrap_or_default();
        if value.len() > DISPLAY_SAMPLE {
            write!(f, " value=[{} ...]", bytes_to_hex(&value[..DISPLAY_SAMPLE]))
        } else {
            write!(f, " value=[{}]", bytes_to_hex(value))
        }
    }
}

fn handler(field_type: FieldType) -> Result<&'static dyn FieldTypeHandler> {
    TypeRegistry::global().handler_for(field_type)
}

/// Empty names are stored as unnamed, matching their wire form.
fn checked_name(name: Option<&str>) -> Result<Option<String>> {
    match name {
        Some(name) if name.len() > MAX_NAME_LEN => Err(CodecError::Argument(format!(
            "name too long: {} bytes, limit is {MAX_NAME_LEN}",
            name.len()
        ))),
        Some("") | None => Ok(None),
        Some(name) => Ok(Some(name.to_string())),
    }
}

/// Re-encode the names inside a FRAME or ARRAY value from one codec config
/// to another.
///
/// `None` means the bytes stay as they are: scalar types, children that do
/// not decode, and values nested deeper than [`MAX_NESTING`].
pub(crate) fn transcode(
    field_type: FieldType,
    bytes: &[u8],
    from: &CodecConfig,
    to: &CodecConfig,
    depth: usize,
) -> Option<Vec<u8>> {
    if depth >= MAX_NESTING {
        return None;
    }
    match field_type {
        FieldType::Frame => {
            let mut buf = bytes;
            let mut out = Vec::with_capacity(bytes.len());
            while buf.has_remaining() {
                let field = DataField::read_shallow(&mut buf, from).ok()?;
                let value = field.value.as_deref().unwrap_or_default();
                let nested = transcode(field.field_type, value, from, to, depth + 1);
                field.write_parts(&mut out, to, nested.as_deref().unwrap_or(value));
            }
            Some(out)
        }
        FieldType::Array => transcode_elements(bytes, |element_type, raw| {
            transcode(element_type, raw, from, to, depth + 1)
        }),
        _ => None,
    }
}

fn read_u8<B: Buf>(buf: &mut B, what: &str) -> Result<u8> {
    ensure(buf, 1, what)?;
    Ok(buf.get_u8())
}

fn ensure<B: Buf>(buf: &B, needed: usize, what: &str) -> Result<()> {
    if buf.remaining() < needed {
        return Err(DecodeError::underflow(format!(
            "reading {what}: need {needed} bytes, {} available",
            buf.remaining()
        ))
        .into());
    }
    Ok(())
}
