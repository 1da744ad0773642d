use dataframe_core::{DataField, DataFrame, FieldType, Value, MAX_NESTING};
use tracing::debug;

use crate::config::WriterConfig;

const INDENT: &str = "  ";

/// Renders frames as JSON text.
///
/// A frame whose fields are all unnamed is written as an array, any other
/// frame as an object; unnamed fields inside an object get the name `""`.
/// UNDEFINED fields are `null`, BOOLEAN fields `true`/`false`, numeric fields
/// their bare literal, and every other type its quoted string form. Frames
/// nested deeper than [`MAX_NESTING`] are written as `null`.
#[derive(Debug)]
pub struct JsonWriter {
    out: String,
    style: WriterConfig,
    indent: usize,
    depth: usize,
}

impl JsonWriter {
    pub fn new(style: WriterConfig) -> Self {
        Self {
            out: String::new(),
            style,
            indent: 0,
            depth: 0,
        }
    }

    /// Write a frame and return the finished text.
    pub fn write(mut self, frame: &DataFrame) -> String {
        self.write_frame(frame);
        self.out
    }

    fn write_frame(&mut self, frame: &DataFrame) {
        let is_array = frame.is_array();
        if frame.is_empty() {
            self.out.push_str("{}");
            return;
        }

        self.depth += 1;
        self.open(if is_array { '[' } else { '{' });
        for (i, field) in frame.iter().enumerate() {
            if i > 0 {
                self.separator();
            }
            if !is_array {
                self.write_string(field.name().unwrap_or_default());
                self.member_separator();
            }
            self.write_field(field);
        }
        self.close(if is_array { ']' } else { '}' });
        self.depth -= 1;
    }

    fn write_field(&mut self, field: &DataField) {
        match field.field_type() {
            FieldType::Undefined => self.out.push_str("null"),
            FieldType::Boolean => {
                let literal = if field.string_value().eq_ignore_ascii_case("true") {
                    "true"
                } else {
                    "false"
                };
                self.out.push_str(literal);
            }
            FieldType::Frame if self.depth >= MAX_NESTING => {
                debug!(depth = self.depth, "frame nested too deep, writing null");
                self.out.push_str("null");
            }
            FieldType::Frame => match field.object_value() {
                Ok(Value::Frame(child)) => self.write_frame(&child),
                _ => self.out.push_str("null"),
            },
            _ if field.value().is_none() => self.out.push_str("null"),
            _ if field.is_numeric() => self.write_number(field),
            _ => self.write_string(&field.string_value()),
        }
    }

    fn write_number(&mut self, field: &DataField) {
        let (finite, floating) = match field.object_value() {
            Ok(Value::Float(v)) => (v.is_finite(), true),
            Ok(Value::Double(v)) => (v.is_finite(), true),
            Ok(_) => (true, false),
            Err(_) => (false, false),
        };
        if !finite {
            self.out.push_str("null");
            return;
        }
        let text = field.string_value();
        self.out.push_str(&text);
        // keep integral floats floating-point when read back
        if floating && !text.contains(['.', 'e', 'E']) {
            self.out.push_str(".0");
        }
    }

    fn write_string(&mut self, text: &str) {
        self.out.push('"');
        escape_into(&mut self.out, text);
        self.out.push('"');
    }

    fn open(&mut self, ch: char) {
        self.out.push(ch);
        if self.style == WriterConfig::Formatted {
            self.indent += 1;
            self.newline();
        }
    }

    fn close(&mut self, ch: char) {
        if self.style == WriterConfig::Formatted {
            self.indent = self.indent.saturating_sub(1);
            self.newline();
        }
        self.out.push(ch);
    }

    fn separator(&mut self) {
        self.out.push(',');
        if self.style == WriterConfig::Formatted {
            self.newline();
        }
    }

    fn member_separator(&mut self) {
        self.out.push(':');
        if self.style == WriterConfig::Formatted {
            self.out.push(' ');
        }
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }
}

/// Append `text` with JSON string escaping applied.
///
/// Quote, backslash and control characters are escaped, as are U+2028 and
/// U+2029 so the output is also valid JavaScript.
pub fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            ch if u32::from(ch) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", u32::from(ch)));
            }
            ch => out.push(ch),
        }
    }
}
