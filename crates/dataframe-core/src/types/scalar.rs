use super::{expect_len, mismatch, FieldType, FieldTypeHandler};
use crate::byteutil;
use crate::error::Result;
use crate::value::{Value, DATE_FORMAT};

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanType;

impl FieldTypeHandler for BooleanType {
    fn field_type(&self) -> FieldType {
        FieldType::Boolean
    }

    fn size(&self) -> Option<usize> {
        Some(1)
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::Boolean(_))
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        match value {
            Value::Boolean(b) => Ok(byteutil::render_bool(*b).to_vec()),
            other => Err(mismatch(self, other)),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        expect_len(self, bytes, 1)?;
        byteutil::retrieve_bool(bytes, 0).map(Value::Boolean)
    }
}

/// UTC instant stored as signed epoch milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateType;

impl FieldTypeHandler for DateType {
    fn field_type(&self) -> FieldType {
        FieldType::Date
    }

    fn size(&self) -> Option<usize> {
        Some(8)
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::Date(_))
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        match value {
            Value::Date(date) => Ok(byteutil::render_date(date).to_vec()),
            other => Err(mismatch(self, other)),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        expect_len(self, bytes, 8)?;
        byteutil::retrieve_date(bytes, 0).map(Value::Date)
    }

    fn string_value(&self, bytes: &[u8]) -> String {
        match byteutil::retrieve_date(bytes, 0) {
            Ok(date) => date.format(DATE_FORMAT).to_string(),
            Err(_) => String::new(),
        }
    }
}
