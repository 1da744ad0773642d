use bytes::{Buf, BufMut};

use super::{mismatch, FieldType, FieldTypeHandler};
use crate::error::{CodecError, DecodeError, DecodeErrorKind, Result};
use crate::registry::TypeRegistry;
use crate::value::Value;

/// A heterogeneous list of values.
///
/// Each element carries its own framing, with no name:
///
/// ```text
/// +------+---------------------+-----------------+
/// | code | len (u32 BE, vars)  | value bytes     |
/// +------+---------------------+-----------------+
/// ```
///
/// Elements are read until the buffer is exhausted. An element with an
/// unknown type code fails the whole array.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayType;

impl FieldTypeHandler for ArrayType {
    fn field_type(&self) -> FieldType {
        FieldType::Array
    }

    fn size(&self) -> Option<usize> {
        None
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::Array(_))
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        let Value::Array(items) = value else {
            return Err(mismatch(self, value));
        };

        let registry = TypeRegistry::global();
        let mut out = Vec::new();
        for item in items {
            let code = registry.type_for(item)?;
            let handler = registry.handler_for(code)?;
            let bytes = handler.encode(item)?;

            out.put_u8(code.code());
            if handler.size().is_none() {
                let len = u32::try_from(bytes.len()).map_err(|_| {
                    CodecError::Encode(format!(
                        "array element of {} bytes is too large",
                        bytes.len()
                    ))
                })?;
                out.put_u32(len);
            }
            out.extend_from_slice(&bytes);
        }
        Ok(out)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        let registry = TypeRegistry::global();
        let mut buf = bytes;
        let mut items = Vec::new();

        while buf.has_remaining() {
            let code = buf.get_u8();
            let handler = registry.handler_for_code(code)?;
            let len = match handler.size() {
                Some(size) => size,
                None => {
                    if buf.remaining() < 4 {
                        return Err(DecodeError::underflow(
                            "array element length prefix truncated",
                        )
                        .into());
                    }
                    buf.get_u32() as usize
                }
            };
            if buf.remaining() < len {
                return Err(DecodeError::new(
                    DecodeErrorKind::BadLength,
                    format!(
                        "array element needs {len} bytes, {} remain",
                        buf.remaining()
                    ),
                )
                .into());
            }
            items.push(handler.decode(&buf[..len])?);
            buf.advance(len);
        }

        Ok(Value::Array(items))
    }
}

/// Rebuild an array's element stream, replacing each element's bytes with
/// what `nested` returns for it. `None` from `nested` keeps the element as
/// it is; a malformed stream gives `None`.
pub(crate) fn transcode_elements(
    bytes: &[u8],
    mut nested: impl FnMut(FieldType, &[u8]) -> Option<Vec<u8>>,
) -> Option<Vec<u8>> {
    let registry = TypeRegistry::global();
    let mut buf = bytes;
    let mut out = Vec::with_capacity(bytes.len());

    while buf.has_remaining() {
        let code = buf.get_u8();
        let handler = registry.handler_for_code(code).ok()?;
        let fixed = handler.size();
        let len = match fixed {
            Some(size) => size,
            None if buf.remaining() >= 4 => buf.get_u32() as usize,
            None => return None,
        };
        if buf.remaining() < len {
            return None;
        }

        let raw = &buf[..len];
        let replaced = nested(handler.field_type(), raw);
        let value = replaced.as_deref().unwrap_or(raw);
        out.put_u8(code);
        if fixed.is_none() {
            out.put_u32(u32::try_from(value.len()).ok()?);
        }
        out.put_slice(value);
        buf.advance(len);
    }

    Some(out)
}
