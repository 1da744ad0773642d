use std::collections::HashSet;
use std::fmt;

use sha2::{Digest, Sha256};
use tracing::trace;

use crate::byteutil::bytes_to_hex;
use crate::config::{CodecConfig, MAX_NESTING};
use crate::error::{CodecError, Result};
use crate::field::DataField;
use crate::registry::TypeRegistry;
use crate::types::FieldType;
use crate::value::Value;

/// An ordered sequence of fields.
///
/// The wire form is the concatenation of each field's encoding with no
/// frame-level header. Names may repeat; name lookups scan in order and use
/// the first match.
///
/// `DataFrame` is a plain owned value. Use [`SharedFrame`] when one frame is
/// mutated from several threads.
///
/// [`SharedFrame`]: crate::SharedFrame
#[derive(Debug, Default)]
pub struct DataFrame {
    fields: Vec<DataField>,
    modified: bool,
}

impl DataFrame {
    /// Create an empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a frame holding a single field.
    pub fn with_field(field: DataField) -> Self {
        Self {
            fields: vec![field],
            modified: false,
        }
    }

    /// Create a frame holding a single named value.
    pub fn with_value(name: Option<&str>, value: impl Into<Value>) -> Result<Self> {
        DataField::new(name, value).map(Self::with_field)
    }

    /// Decode a complete frame with the default codec config.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with(data, &CodecConfig::default())
    }

    /// Decode fields until `data` is exhausted.
    ///
    /// A failing field is reported with its index, its starting offset, the
    /// offset of the field before it and the last field that decoded.
    pub fn from_bytes_with(data: &[u8], config: &CodecConfig) -> Result<Self> {
        let mut frame = Self::new();
        let mut buf = data;
        let mut loc = 0usize;

        while !buf.is_empty() {
            let ploc = loc;
            loc = data.len() - buf.len();

            match DataField::decode_from_with(&mut buf, config) {
                Ok(field) => {
                    trace!(
                        index = frame.fields.len(),
                        offset = loc,
                        field_type = %field.field_type(),
                        "decoded field"
                    );
                    frame.fields.push(field);
                }
                Err(CodecError::Decode(err)) => {
                    let err =
                        err.within_frame(loc, ploc, frame.fields.len(), frame.fields.last());
                    return Err(err.into());
                }
                Err(err) => return Err(err),
            }
        }

        Ok(frame)
    }

    /// Append a new field. Returns its index.
    pub fn add(&mut self, name: Option<&str>, value: impl Into<Value>) -> Result<usize> {
        let field = DataField::new(name, value)?;
        Ok(self.add_field(field))
    }

    /// Append an existing field. Returns its index.
    pub fn add_field(&mut self, field: DataField) -> usize {
        self.modified = true;
        self.fields.push(field);
        self.fields.len() - 1
    }

    /// Replace the first field named `name` in place, or append if absent.
    /// Unnamed values are always appended.
    pub fn put(&mut self, name: Option<&str>, value: impl Into<Value>) -> Result<usize> {
        let field = DataField::new(name, value)?;
        Ok(self.put_field(field))
    }

    /// [`put`](Self::put) for an existing field.
    pub fn put_field(&mut self, field: DataField) -> usize {
        let existing = field.name().and_then(|name| self.position(name));
        match existing {
            Some(index) => {
                self.fields[index] = field;
                self.modified = true;
                index
            }
            None => self.add_field(field),
        }
    }

    /// Remove the first field named `name`.
    pub fn remove(&mut self, name: &str) -> Option<DataField> {
        let index = self.position(name)?;
        self.modified = true;
        Some(self.fields.remove(index))
    }

    /// Remove every field named `name`, returning them in frame order.
    pub fn remove_all(&mut self, name: &str) -> Vec<DataField> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.fields)
            .into_iter()
            .partition(|field| field.name() == Some(name));
        self.fields = kept;
        if !removed.is_empty() {
            self.modified = true;
        }
        removed
    }

    /// Remove the first field named `name` and append a new one.
    ///
    /// The value is encoded before anything is removed, so an unsupported
    /// value leaves the frame untouched.
    pub fn replace(&mut self, name: &str, value: impl Into<Value>) -> Result<usize> {
        let field = DataField::new(Some(name), value)?;
        self.remove(name);
        Ok(self.add_field(field))
    }

    /// Remove every field named `name` and append a single new one.
    pub fn replace_all(&mut self, name: &str, value: impl Into<Value>) -> Result<usize> {
        let field = DataField::new(Some(name), value)?;
        self.remove_all(name);
        Ok(self.add_field(field))
    }

    /// Put a copy of every field of `other` into this frame.
    pub fn merge(&mut self, other: &DataFrame) {
        for field in &other.fields {
            self.put_field(field.clone());
        }
    }

    /// Add a copy of every field of `other` to this frame.
    pub fn populate(&mut self, other: &DataFrame) {
        for field in &other.fields {
            self.add_field(field.clone());
        }
    }

    pub fn clear(&mut self) {
        if !self.fields.is_empty() {
            self.fields.clear();
            self.modified = true;
        }
    }

    /// First field named `name`.
    pub fn field(&self, name: &str) -> Option<&DataField> {
        self.fields.iter().find(|field| field.name() == Some(name))
    }

    pub fn field_at(&self, index: usize) -> Result<&DataField> {
        self.fields.get(index).ok_or(CodecError::IndexOutOfRange {
            index,
            len: self.fields.len(),
        })
    }

    /// Overwrite the field at `index`.
    pub fn set_field_at(&mut self, index: usize, field: DataField) -> Result<()> {
        let len = self.fields.len();
        let slot = self
            .fields
            .get_mut(index)
            .ok_or(CodecError::IndexOutOfRange { index, len })?;
        *slot = field;
        self.modified = true;
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Decoded value of the first field named `name`.
    pub fn object(&self, name: &str) -> Result<Option<Value>> {
        self.field(name).map(DataField::object_value).transpose()
    }

    pub fn object_at(&self, index: usize) -> Result<Value> {
        self.field_at(index)?.object_value()
    }

    /// Wire encoding of the first field named `name`.
    pub fn field_wire_bytes(&self, name: &str) -> Option<Vec<u8>> {
        self.field(name).map(DataField::wire_bytes)
    }

    /// Unique field names in first-seen order.
    pub fn names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.fields
            .iter()
            .filter_map(DataField::name)
            .filter(|name| seen.insert(*name))
            .map(str::to_string)
            .collect()
    }

    pub fn fields(&self) -> &[DataField] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataField> {
        self.fields.iter()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when no field has a name, including the empty frame.
    pub fn is_array(&self) -> bool {
        self.fields.iter().all(|field| field.name().is_none())
    }

    /// True once a mutating call has run since construction.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    /// Number of wire types understood by the codec.
    pub fn type_count() -> usize {
        TypeRegistry::global().len()
    }

    /// Encode every field in order.
    pub fn to_wire_bytes(&self) -> Vec<u8> {
        self.to_wire_bytes_with(&CodecConfig::default())
    }

    pub fn to_wire_bytes_with(&self, config: &CodecConfig) -> Vec<u8> {
        let mut out = Vec::new();
        for field in &self.fields {
            field.write_to_with(&mut out, config);
        }
        out
    }

    /// SHA-256 of the wire encoding.
    pub fn digest(&self) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(self.to_wire_bytes());
        hasher.finalize().to_vec()
    }

    /// Upper-case hex form of [`digest`](Self::digest).
    pub fn digest_string(&self) -> String {
        bytes_to_hex(&self.digest())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name() == Some(name))
    }
}

impl Clone for DataFrame {
    /// Deep copy; the copy starts unmodified.
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            modified: false,
        }
    }
}

/// Frames compare by their fields only.
impl PartialEq for DataFrame {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for DataFrame {}

impl From<DataField> for DataFrame {
    fn from(field: DataField) -> Self {
        Self::with_field(field)
    }
}

impl<'a> IntoIterator for &'a DataFrame {
    type Item = &'a DataField;
    type IntoIter = std::slice::Iter<'a, DataField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Debug rendering in a JSON-like shape. Strings are not escaped, so the
/// output is not guaranteed to parse as JSON. Frames nested deeper than
/// [`MAX_NESTING`] render as `...`.
impl fmt::Display for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_nested(f, 0)
    }
}

impl DataFrame {
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        if depth >= MAX_NESTING {
            return f.write_str("...");
        }
        if self.fields.is_empty() {
            return f.write_str("{}");
        }

        let is_array = self.is_array();
        f.write_str(if is_array { "[" } else { "{" })?;

        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if !is_array {
                write!(f, "\"{}\":", field.name().unwrap_or_default())?;
            }

            match field.field_type() {
                FieldType::Undefined => f.write_str("null")?,
                FieldType::Boolean => f.write_str(&field.string_value().to_lowercase())?,
                FieldType::Frame => match field.object_value() {
                    Ok(Value::Frame(child)) => child.fmt_nested(f, depth + 1)?,
                    _ => f.write_str("null")?,
                },
                _ if field.is_numeric() => f.write_str(&field.string_value())?,
                _ if field.value().is_none() => f.write_str("null")?,
                _ => write!(f, "\"{}\"", field.string_value())?,
            }
        }

        f.write_str(if is_array { "]" } else { "}" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeError, DecodeErrorKind};

    fn sample() -> DataFrame {
        let mut frame = DataFrame::new();
        frame.add(Some("a"), 1i32).unwrap();
        frame.add(Some("b"), "two").unwrap();
        frame.add(Some("a"), 3i32).unwrap();
        frame
    }

    #[test]
    fn empty_frame() {
        let frame = DataFrame::new();
        assert!(frame.is_empty());
        assert!(frame.is_array());
        assert!(frame.to_wire_bytes().is_empty());
        assert!(!frame.is_modified());
        assert_eq!(frame.to_string(), "{}");
    }

    #[test]
    fn add_always_appends() {
        let mut frame = sample();
        assert_eq!(frame.field_count(), 3);
        assert!(frame.is_modified());
        assert_eq!(frame.add(Some("a"), 4i32).unwrap(), 3);
        assert_eq!(frame.field_count(), 4);
        assert_eq!(frame.object("a").unwrap(), Some(Value::S32(1)));
    }

    #[test]
    fn put_replaces_in_place() {
        let mut frame = sample();
        let index = frame.put(Some("b"), 2u8).unwrap();
        assert_eq!(index, 1);
        assert_eq!(frame.field_count(), 3);
        assert_eq!(frame.field_at(1).unwrap().field_type(), FieldType::U8);
        assert_eq!(frame.names(), vec!["a", "b"]);

        assert_eq!(frame.put(Some("c"), true).unwrap(), 3);
        assert_eq!(frame.put(None, 0u8).unwrap(), 4);
    }

    #[test]
    fn remove_and_remove_all() {
        let mut frame = sample();
        let removed = frame.remove("a").unwrap();
        assert_eq!(removed.object_value().unwrap(), Value::S32(1));
        assert_eq!(frame.field_count(), 2);
        assert!(frame.remove("missing").is_none());

        let mut frame = sample();
        let removed = frame.remove_all("a");
        assert_eq!(removed.len(), 2);
        assert_eq!(removed[1].object_value().unwrap(), Value::S32(3));
        assert_eq!(frame.field_count(), 1);
        assert!(!frame.contains("a"));
    }

    #[test]
    fn only_real_removals_mark_modified() {
        let mut frame = sample();
        frame.set_modified(false);
        assert!(frame.remove_all("missing").is_empty());
        assert!(!frame.is_modified());

        frame.clear();
        assert!(frame.is_empty());
        assert!(frame.is_modified());

        frame.set_modified(false);
        frame.clear();
        assert!(!frame.is_modified());
    }

    #[test]
    fn replace_moves_field_to_end() {
        let mut frame = sample();
        assert_eq!(frame.replace("a", 9i64).unwrap(), 2);
        assert_eq!(frame.field_at(0).unwrap().name(), Some("b"));
        assert_eq!(frame.object_at(1).unwrap(), Value::S32(3));

        let mut frame = sample();
        assert_eq!(frame.replace_all("a", 9i64).unwrap(), 1);
        assert_eq!(frame.field_count(), 2);
    }

    #[test]
    fn replace_with_oversized_name_leaves_frame_untouched() {
        let mut frame = sample();
        frame.set_modified(false);
        let long = "x".repeat(300);
        assert!(frame.replace(&long, 1i32).is_err());
        assert_eq!(frame.field_count(), 3);
        assert!(!frame.is_modified());
    }

    #[test]
    fn merge_puts_and_populate_adds() {
        let mut other = DataFrame::new();
        other.add(Some("a"), "merged").unwrap();
        other.add(Some("z"), 26u8).unwrap();

        let mut merged = sample();
        merged.merge(&other);
        assert_eq!(merged.field_count(), 4);
        assert_eq!(merged.object("a").unwrap(), Some(Value::from("merged")));

        let mut populated = sample();
        populated.populate(&other);
        assert_eq!(populated.field_count(), 5);
        assert_eq!(populated.object("a").unwrap(), Some(Value::S32(1)));
    }

    #[test]
    fn clone_is_deep_and_unmodified() {
        let frame = sample();
        let mut copy = frame.clone();
        assert!(!copy.is_modified());
        assert_eq!(copy, frame);
        copy.put(Some("a"), 0i32).unwrap();
        assert_ne!(copy, frame);
    }

    #[test]
    fn index_access_is_bounds_checked() {
        let mut frame = sample();
        assert!(matches!(
            frame.field_at(3),
            Err(CodecError::IndexOutOfRange { index: 3, len: 3 })
        ));
        let field = DataField::new(Some("n"), Value::Null).unwrap();
        assert!(frame.set_field_at(5, field.clone()).is_err());
        frame.set_field_at(0, field).unwrap();
        assert!(frame.field_at(0).unwrap().is_null());
    }

    #[test]
    fn wire_round_trip_preserves_order_and_types() {
        let frame = sample();
        let decoded = DataFrame::from_bytes(&frame.to_wire_bytes()).unwrap();
        assert_eq!(decoded, frame);
        assert!(!decoded.is_modified());
        assert_eq!(decoded.digest(), frame.digest());
    }

    #[test]
    fn null_fields_survive_wire_round_trip() {
        let mut frame = DataFrame::new();
        frame.add(Some("u"), Value::Null).unwrap();
        let null = DataField::with_type(Some("s"), FieldType::String, Value::Null);
        frame.add_field(null.unwrap());
        let null = DataField::with_type(Some("i"), FieldType::S32, Value::Null);
        frame.add_field(null.unwrap());

        let decoded = DataFrame::from_bytes(&frame.to_wire_bytes()).unwrap();
        assert_eq!(decoded, frame);
        assert_eq!(decoded.digest(), frame.digest());
    }

    #[test]
    fn display_elides_deep_nesting() {
        let mut frame = DataFrame::new();
        frame.add(None, 1u8).unwrap();
        for _ in 0..MAX_NESTING + 5 {
            frame = DataFrame::with_value(None, frame).unwrap();
        }
        let text = frame.to_string();
        assert!(text.contains("..."));
        assert!(!text.contains('1'));
        assert_eq!(text.matches('[').count(), MAX_NESTING);
    }

    #[test]
    fn decode_error_carries_position() {
        let frame = sample();
        let mut bytes = frame.to_wire_bytes();
        let good_len = bytes.len();
        bytes.extend_from_slice(&[1, b'q', 8, 0]);

        let err = DataFrame::from_bytes(&bytes).unwrap_err();
        let CodecError::Decode(err) = err else {
            panic!("expected decode error, got {err:?}");
        };
        assert_eq!(err.kind, DecodeErrorKind::Underflow);
        assert_eq!(err.field_index, Some(3));
        assert_eq!(err.position, good_len);
        assert_eq!(err.last_field.as_deref(), frame.fields().last());
        assert!(err.message.starts_with("data underflow adding field"));
    }

    #[test]
    fn unknown_type_code_fails_decode() {
        let err = DataFrame::from_bytes(&[0, 200]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Decode(DecodeError { kind: DecodeErrorKind::UnknownType, .. })
        ));
    }

    #[test]
    fn array_values_decode_lazily() {
        // The array element has type code 99; the field itself is well formed.
        let frame = DataFrame::from_bytes(&[1, b'f', 17, 0, 0, 0, 2, 99, 0]).unwrap();
        assert_eq!(frame.field_count(), 1);
        assert!(matches!(
            frame.object("f"),
            Err(CodecError::UnsupportedType { code: 99 })
        ));
    }

    #[test]
    fn corrupt_nested_frame_decodes_empty() {
        let mut outer = DataFrame::new();
        outer.add(Some("before"), 1u8).unwrap();
        // FRAME field whose 3 value bytes claim an S32.
        let bad = DataField::from_raw(Some("bad"), FieldType::Frame, Some(vec![0, 8, 1])).unwrap();
        outer.add_field(bad);
        outer.add(Some("after"), 2u8).unwrap();

        let decoded = DataFrame::from_bytes(&outer.to_wire_bytes()).unwrap();
        assert_eq!(decoded.field_count(), 3);
        assert_eq!(
            decoded.object("bad").unwrap(),
            Some(Value::Frame(DataFrame::new()))
        );
        assert_eq!(decoded.object("after").unwrap(), Some(Value::U8(2)));
    }

    #[test]
    fn digest_string_is_hex() {
        let text = sample().digest_string();
        assert_eq!(text.len(), 64);
        assert!(text.chars().all(|ch| ch.is_ascii_hexdigit() && !ch.is_ascii_lowercase()));
        assert_ne!(text, DataFrame::new().digest_string());
    }

    #[test]
    fn display_is_json_like() {
        let mut frame = sample();
        let mut child = DataFrame::new();
        child.add(None, true).unwrap();
        child.add(None, Value::Null).unwrap();
        frame.add(Some("c"), child).unwrap();
        assert_eq!(
            frame.to_string(),
            r#"{"a":1,"b":"two","a":3,"c":[true,null]}"#
        );
    }

    #[test]
    fn type_count_covers_all_codes() {
        assert_eq!(DataFrame::type_count(), 18);
    }
}
