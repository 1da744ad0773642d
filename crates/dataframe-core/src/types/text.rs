use url::Url;

use super::{mismatch, FieldType, FieldTypeHandler};
use crate::byteutil::{latin1_decode, latin1_encode};
use crate::error::{DecodeError, Result};
use crate::value::Value;

/// Raw bytes, passed through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteArrayType;

impl FieldTypeHandler for ByteArrayType {
    fn field_type(&self) -> FieldType {
        FieldType::ByteArray
    }

    fn size(&self) -> Option<usize> {
        None
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::Bytes(_))
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        match value {
            Value::Bytes(bytes) => Ok(bytes.clone()),
            other => Err(mismatch(self, other)),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        Ok(Value::Bytes(bytes.to_vec()))
    }
}

/// Text in ISO-8859-1, one byte per character.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringType;

impl FieldTypeHandler for StringType {
    fn field_type(&self) -> FieldType {
        FieldType::String
    }

    fn size(&self) -> Option<usize> {
        None
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::String(_))
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        match value {
            Value::String(text) => Ok(latin1_encode(text)),
            other => Err(mismatch(self, other)),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        Ok(Value::String(latin1_decode(bytes)))
    }

    fn string_value(&self, bytes: &[u8]) -> String {
        latin1_decode(bytes)
    }
}

/// An absolute URI carried as its Latin-1 string form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UriType;

impl FieldTypeHandler for UriType {
    fn field_type(&self) -> FieldType {
        FieldType::Uri
    }

    fn size(&self) -> Option<usize> {
        None
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::Uri(_))
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        match value {
            Value::Uri(uri) => Ok(latin1_encode(uri.as_str())),
            other => Err(mismatch(self, other)),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        let text = latin1_decode(bytes);
        Url::parse(&text)
            .map(Value::Uri)
            .map_err(|err| DecodeError::malformed(format!("invalid URI '{text}': {err}")).into())
    }

    fn string_value(&self, bytes: &[u8]) -> String {
        latin1_decode(bytes)
    }
}
