use tracing::{debug, trace};

use super::{mismatch, FieldType, FieldTypeHandler};
use crate::byteutil::dump;
use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::frame::DataFrame;
use crate::value::Value;

/// A nested frame, encoded as the child's own field sequence.
///
/// Decoding is lenient: bytes that fail to parse as a frame produce an empty
/// frame so one damaged child does not abort decoding of its siblings.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameType;

impl FieldTypeHandler for FrameType {
    fn field_type(&self) -> FieldType {
        FieldType::Frame
    }

    fn size(&self) -> Option<usize> {
        None
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::Frame(_))
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        match value {
            Value::Frame(frame) => Ok(frame.to_wire_bytes()),
            other => Err(mismatch(self, other)),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        match DataFrame::from_bytes(bytes) {
            Ok(frame) => Ok(Value::Frame(frame)),
            Err(err @ (CodecError::Decode(_) | CodecError::UnsupportedType { .. })) => {
                debug!(
                    len = bytes.len(),
                    error = %err,
                    "nested frame failed to decode, using empty frame"
                );
                trace!(
                    "nested frame bytes:\n{}",
                    dump(bytes, CodecConfig::default().dump_limit)
                );
                Ok(Value::Frame(DataFrame::new()))
            }
            Err(err) => Err(err),
        }
    }
}

/// The null type: zero value bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct UndefinedType;

impl FieldTypeHandler for UndefinedType {
    fn field_type(&self) -> FieldType {
        FieldType::Undefined
    }

    fn size(&self) -> Option<usize> {
        Some(0)
    }

    fn accepts(&self, value: &Value) -> bool {
        value.is_null()
    }

    fn encode(&self, _value: &Value) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn decode(&self, _bytes: &[u8]) -> Result<Value> {
        Ok(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_encodes_child_fields() {
        let mut child = DataFrame::new();
        child.add(Some("b"), 1u8).unwrap();

        let bytes = FrameType.encode(&Value::Frame(child.clone())).unwrap();
        assert_eq!(bytes, vec![1, b'b', 5, 1]);
        assert_eq!(FrameType.decode(&bytes).unwrap(), Value::Frame(child));
    }

    #[test]
    fn corrupt_frame_decodes_empty() {
        // Type code 99 is not registered.
        let value = FrameType.decode(&[1, b'x', 99, 0, 0]).unwrap();
        assert_eq!(value, Value::Frame(DataFrame::new()));

        // Truncated S32.
        let value = FrameType.decode(&[0, 8, 0, 1]).unwrap();
        assert_eq!(value, Value::Frame(DataFrame::new()));
    }

    #[test]
    fn empty_bytes_are_an_empty_frame() {
        assert_eq!(FrameType.decode(&[]).unwrap(), Value::Frame(DataFrame::new()));
    }

    #[test]
    fn undefined_is_always_null() {
        assert!(UndefinedType.accepts(&Value::Null));
        assert!(!UndefinedType.accepts(&Value::from(0u8)));
        assert!(UndefinedType.encode(&Value::Null).unwrap().is_empty());
        assert_eq!(UndefinedType.decode(&[]).unwrap(), Value::Null);
        assert_eq!(UndefinedType.size(), Some(0));
    }
}
