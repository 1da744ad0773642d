use dataframe_core::{DataField, DataFrame, Value};
use tracing::debug;

use crate::config::{ParserConfig, MIN_BUFFER_SIZE};
use crate::error::{JsonError, ParseError, Result};

const REPLACEMENT: char = '\u{FFFD}';

/// Single-pass recursive-descent parser from JSON text to frames.
///
/// Characters are pulled from the source into a fixed-size buffer and
/// refilled as it drains. String and number tokens are sliced out of the
/// buffer through a capture that spans refills; escape sequences pause the
/// capture and append their decoded character directly.
///
/// Objects become frames of named fields, arrays frames of unnamed fields.
/// Integers without fraction or exponent become S64 fields, other numbers
/// DOUBLE, and a literal that fails numeric conversion is kept as a STRING.
pub struct JsonFrameParser<I> {
    source: I,
    config: ParserConfig,
    buffer: Vec<char>,
    fill: usize,
    index: usize,
    buffer_offset: usize,
    line: usize,
    line_offset: usize,
    current: Option<char>,
    capture: String,
    capture_start: Option<usize>,
    pending_surrogate: Option<u16>,
    depth: usize,
}

impl<'a> JsonFrameParser<std::str::Chars<'a>> {
    /// Parser over a string, with a buffer sized to the text.
    pub fn from_text(text: &'a str) -> Self {
        Self::with_config(text.chars(), ParserConfig::for_text_len(text.len()))
    }

    /// Parser over a string with explicit config.
    pub fn from_text_with(text: &'a str, config: ParserConfig) -> Self {
        Self::with_config(text.chars(), config)
    }
}

impl<I: Iterator<Item = char>> JsonFrameParser<I> {
    pub fn new(source: I) -> Self {
        Self::with_config(source, ParserConfig::default())
    }

    pub fn with_config(source: I, config: ParserConfig) -> Self {
        Self {
            source,
            config,
            buffer: vec!['\0'; config.buffer_size.max(MIN_BUFFER_SIZE)],
            fill: 0,
            index: 0,
            buffer_offset: 0,
            line: 1,
            line_offset: 0,
            current: None,
            capture: String::new(),
            capture_start: None,
            pending_surrogate: None,
            depth: 0,
        }
    }

    /// Parse every root object or array in the text.
    ///
    /// Whitespace may separate roots. Anything other than `{` or `[` at the
    /// top level is an error.
    pub fn parse(mut self) -> Result<Vec<DataFrame>> {
        let result = self.parse_all();
        if let Err(err) = &result {
            log_failure(err);
        }
        result
    }

    /// Parse exactly one root value of any kind.
    ///
    /// A scalar root is wrapped in a frame holding one unnamed field.
    pub fn parse_root(mut self) -> Result<DataFrame> {
        let result = self.parse_single();
        if let Err(err) = &result {
            log_failure(err);
        }
        result
    }

    fn parse_all(&mut self) -> Result<Vec<DataFrame>> {
        let mut frames = Vec::new();
        self.read();
        self.skip_whitespace();
        while matches!(self.current, Some('{' | '[')) {
            frames.push(self.read_root_value()?);
            self.skip_whitespace();
        }
        if !self.is_end_of_text() {
            return Err(self.error("Unexpected character"));
        }
        Ok(frames)
    }

    fn parse_single(&mut self) -> Result<DataFrame> {
        self.read();
        self.skip_whitespace();
        let frame = self.read_root_value()?;
        self.skip_whitespace();
        if !self.is_end_of_text() {
            return Err(self.error("Unexpected character"));
        }
        Ok(frame)
    }

    fn read_root_value(&mut self) -> Result<DataFrame> {
        match self.current {
            Some('[') => self.read_nested(Self::read_array),
            Some('{') => self.read_nested(Self::read_object),
            _ => {
                let value = self.read_scalar()?;
                Ok(DataFrame::with_field(DataField::new(None, value)?))
            }
        }
    }

    fn read_nested(&mut self, read: fn(&mut Self) -> Result<DataFrame>) -> Result<DataFrame> {
        if self.depth >= self.config.max_depth {
            return Err(self.error("Nesting too deep"));
        }
        self.depth += 1;
        let frame = read(self);
        self.depth -= 1;
        frame
    }

    fn read_object(&mut self) -> Result<DataFrame> {
        self.read();
        let mut object = DataFrame::new();
        self.skip_whitespace();
        if self.read_char('}') {
            return Ok(object);
        }
        loop {
            self.skip_whitespace();
            let name = self.read_name()?;
            self.skip_whitespace();
            if !self.read_char(':') {
                return Err(self.expected("':'"));
            }
            self.skip_whitespace();
            let field = self.read_field_value(Some(&name))?;
            object.add_field(field);
            self.skip_whitespace();
            if !self.read_char(',') {
                break;
            }
        }
        if !self.read_char('}') {
            return Err(self.expected("',' or '}'"));
        }
        object.set_modified(false);
        Ok(object)
    }

    fn read_array(&mut self) -> Result<DataFrame> {
        self.read();
        let mut array = DataFrame::new();
        self.skip_whitespace();
        if self.read_char(']') {
            return Ok(array);
        }
        loop {
            self.skip_whitespace();
            let field = self.read_field_value(None)?;
            array.add_field(field);
            self.skip_whitespace();
            if !self.read_char(',') {
                break;
            }
        }
        if !self.read_char(']') {
            return Err(self.expected("',' or ']'"));
        }
        array.set_modified(false);
        Ok(array)
    }

    fn read_field_value(&mut self, name: Option<&str>) -> Result<DataField> {
        let value = match self.current {
            Some('[') => Value::Frame(self.read_nested(Self::read_array)?),
            Some('{') => Value::Frame(self.read_nested(Self::read_object)?),
            Some(']' | ',') if self.config.lenient_commas => Value::Null,
            _ => self.read_scalar()?,
        };
        Ok(DataField::new(name, value)?)
    }

    fn read_scalar(&mut self) -> Result<Value> {
        match self.current {
            Some('n') => {
                self.read_literal("ull")?;
                Ok(Value::Null)
            }
            Some('t') => {
                self.read_literal("rue")?;
                Ok(Value::Boolean(true))
            }
            Some('f') => {
                self.read_literal("alse")?;
                Ok(Value::Boolean(false))
            }
            Some('"') => self.read_string().map(Value::String),
            Some('-' | '0'..='9') => self.read_number(),
            _ => Err(self.expected("value")),
        }
    }

    /// Consume the current character and then `rest`, one required
    /// character at a time.
    fn read_literal(&mut self, rest: &str) -> Result<()> {
        self.read();
        for ch in rest.chars() {
            self.read_required_char(ch)?;
        }
        Ok(())
    }

    fn read_name(&mut self) -> Result<String> {
        if self.current != Some('"') {
            return Err(self.expected("name"));
        }
        self.read_string()
    }

    fn read_string(&mut self) -> Result<String> {
        self.read();
        self.start_capture();
        loop {
            match self.current {
                Some('"') => break,
                Some('\\') => {
                    self.pause_capture();
                    self.read_escape()?;
                    self.start_capture();
                }
                Some(ch) if u32::from(ch) >= 0x20 => {
                    self.flush_surrogate();
                    self.read();
                }
                _ => return Err(self.expected("valid string character")),
            }
        }
        self.flush_surrogate();
        let text = self.end_capture();
        self.read();
        Ok(text)
    }

    fn read_escape(&mut self) -> Result<()> {
        self.read();
        let decoded = match self.current {
            Some(ch @ ('"' | '/' | '\\')) => ch,
            Some('b') => '\u{8}',
            Some('f') => '\u{C}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('u') => {
                let mut unit = 0u16;
                for _ in 0..4 {
                    self.read();
                    let digit = self
                        .current
                        .and_then(|ch| ch.to_digit(16))
                        .ok_or_else(|| self.expected("hexadecimal digit"))?;
                    unit = (unit << 4) | digit as u16;
                }
                self.push_code_unit(unit);
                self.read();
                return Ok(());
            }
            _ => return Err(self.expected("valid escape sequence")),
        };
        self.flush_surrogate();
        self.capture.push(decoded);
        self.read();
        Ok(())
    }

    /// Append one UTF-16 code unit from a `\u` escape, pairing surrogates.
    /// Unpaired surrogates become U+FFFD.
    fn push_code_unit(&mut self, unit: u16) {
        if let Some(high) = self.pending_surrogate.take() {
            if (0xDC00..=0xDFFF).contains(&unit) {
                let scalar =
                    0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00);
                self.capture
                    .push(char::from_u32(scalar).unwrap_or(REPLACEMENT));
                return;
            }
            self.capture.push(REPLACEMENT);
        }
        match unit {
            0xD800..=0xDBFF => self.pending_surrogate = Some(unit),
            _ => self
                .capture
                .push(char::from_u32(u32::from(unit)).unwrap_or(REPLACEMENT)),
        }
    }

    fn flush_surrogate(&mut self) {
        if self.pending_surrogate.take().is_some() {
            self.capture.push(REPLACEMENT);
        }
    }

    fn read_number(&mut self) -> Result<Value> {
        self.start_capture();
        self.read_char('-');
        let first = self.current;
        if !self.read_digit() {
            return Err(self.expected("digit"));
        }
        if first != Some('0') {
            while self.read_digit() {}
        }
        let fraction = self.read_fraction()?;
        let exponent = self.read_exponent()?;
        let literal = self.end_capture();

        let value = if fraction || exponent {
            literal.parse::<f64>().ok().map(Value::Double)
        } else {
            literal.parse::<i64>().ok().map(Value::S64)
        };
        Ok(value.unwrap_or(Value::String(literal)))
    }

    fn read_fraction(&mut self) -> Result<bool> {
        if !self.read_char('.') {
            return Ok(false);
        }
        if !self.read_digit() {
            return Err(self.expected("digit"));
        }
        while self.read_digit() {}
        Ok(true)
    }

    fn read_exponent(&mut self) -> Result<bool> {
        if !self.read_char('e') && !self.read_char('E') {
            return Ok(false);
        }
        if !self.read_char('+') {
            self.read_char('-');
        }
        if !self.read_digit() {
            return Err(self.expected("digit"));
        }
        while self.read_digit() {}
        Ok(true)
    }

    fn read_required_char(&mut self, ch: char) -> Result<()> {
        if !self.read_char(ch) {
            return Err(self.expected(&format!("'{ch}'")));
        }
        Ok(())
    }

    fn read_char(&mut self, ch: char) -> bool {
        if self.current != Some(ch) {
            return false;
        }
        self.read();
        true
    }

    fn read_digit(&mut self) -> bool {
        if !matches!(self.current, Some('0'..='9')) {
            return false;
        }
        self.read();
        true
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current, Some(' ' | '\t' | '\n' | '\r')) {
            self.read();
        }
    }

    fn is_end_of_text(&self) -> bool {
        self.current.is_none()
    }

    /// Advance to the next character, refilling the buffer when drained.
    fn read(&mut self) {
        if self.index == self.fill {
            if let Some(start) = self.capture_start {
                self.capture.extend(&self.buffer[start..self.fill]);
                self.capture_start = Some(0);
            }
            self.buffer_offset += self.fill;
            self.fill = self.refill();
            self.index = 0;
            if self.fill == 0 {
                self.current = None;
                return;
            }
        }
        if self.current == Some('\n') {
            self.line += 1;
            self.line_offset = self.buffer_offset + self.index;
        }
        self.current = Some(self.buffer[self.index]);
        self.index += 1;
    }

    fn refill(&mut self) -> usize {
        let mut filled = 0;
        while filled < self.buffer.len() {
            match self.source.next() {
                Some(ch) => {
                    self.buffer[filled] = ch;
                    filled += 1;
                }
                None => break,
            }
        }
        filled
    }

    fn start_capture(&mut self) {
        self.capture_start = Some(self.index.saturating_sub(1));
    }

    fn capture_end(&self) -> usize {
        if self.current.is_none() {
            self.index
        } else {
            self.index - 1
        }
    }

    fn pause_capture(&mut self) {
        let end = self.capture_end();
        if let Some(start) = self.capture_start.take() {
            self.capture.extend(&self.buffer[start..end]);
        }
    }

    fn end_capture(&mut self) -> String {
        self.pause_capture();
        std::mem::take(&mut self.capture)
    }

    fn error(&self, message: &str) -> JsonError {
        let absolute = self.buffer_offset + self.index;
        let offset = if self.is_end_of_text() {
            absolute
        } else {
            absolute - 1
        };
        ParseError {
            message: message.to_string(),
            offset,
            line: self.line,
            column: absolute - self.line_offset,
            character: self.current,
        }
        .into()
    }

    fn expected(&self, what: &str) -> JsonError {
        if self.is_end_of_text() {
            self.error("Unexpected end of input")
        } else {
            self.error(&format!("Expected {what}"))
        }
    }
}

fn log_failure(err: &JsonError) {
    match err.parse_error() {
        Some(parse) => debug!(
            offset = parse.offset,
            line = parse.line,
            column = parse.column,
            "JSON parse failed: {}",
            parse.message
        ),
        None => debug!(error = %err, "JSON conversion failed"),
    }
}
