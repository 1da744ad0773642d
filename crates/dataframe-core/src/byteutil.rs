//! Fixed-width big-endian scalar codecs and byte diagnostics.
//!
//! Every multi-byte value is written in network byte order. Unsigned and
//! signed variants of the same width share one bit pattern, and floating point
//! values travel as their raw IEEE-754 bits.

use std::fmt::Write as _;

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{DecodeError, Result};

pub fn render_i8(value: i8) -> [u8; 1] {
    value.to_be_bytes()
}

pub fn render_u8(value: u8) -> [u8; 1] {
    [value]
}

pub fn render_i16(value: i16) -> [u8; 2] {
    value.to_be_bytes()
}

pub fn render_u16(value: u16) -> [u8; 2] {
    value.to_be_bytes()
}

pub fn render_i32(value: i32) -> [u8; 4] {
    value.to_be_bytes()
}

pub fn render_u32(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}

pub fn render_i64(value: i64) -> [u8; 8] {
    value.to_be_bytes()
}

pub fn render_u64(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

pub fn render_f32(value: f32) -> [u8; 4] {
    value.to_bits().to_be_bytes()
}

pub fn render_f64(value: f64) -> [u8; 8] {
    value.to_bits().to_be_bytes()
}

pub fn render_bool(value: bool) -> [u8; 1] {
    [u8::from(value)]
}

/// Milliseconds since the Unix epoch, UTC.
pub fn render_date(value: &DateTime<Utc>) -> [u8; 8] {
    render_i64(value.timestamp_millis())
}

fn take<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N]> {
    buf.get(offset..offset.saturating_add(N))
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| {
            DecodeError::underflow(format!(
                "need {N} bytes at offset {offset}, buffer holds {}",
                buf.len()
            ))
            .into()
        })
}

pub fn retrieve_i8(buf: &[u8], offset: usize) -> Result<i8> {
    take::<1>(buf, offset).map(i8::from_be_bytes)
}

pub fn retrieve_u8(buf: &[u8], offset: usize) -> Result<u8> {
    take::<1>(buf, offset).map(u8::from_be_bytes)
}

pub fn retrieve_i16(buf: &[u8], offset: usize) -> Result<i16> {
    take::<2>(buf, offset).map(i16::from_be_bytes)
}

pub fn retrieve_u16(buf: &[u8], offset: usize) -> Result<u16> {
    take::<2>(buf, offset).map(u16::from_be_bytes)
}

pub fn retrieve_i32(buf: &[u8], offset: usize) -> Result<i32> {
    take::<4>(buf, offset).map(i32::from_be_bytes)
}

pub fn retrieve_u32(buf: &[u8], offset: usize) -> Result<u32> {
    take::<4>(buf, offset).map(u32::from_be_bytes)
}

pub fn retrieve_i64(buf: &[u8], offset: usize) -> Result<i64> {
    take::<8>(buf, offset).map(i64::from_be_bytes)
}

pub fn retrieve_u64(buf: &[u8], offset: usize) -> Result<u64> {
    take::<8>(buf, offset).map(u64::from_be_bytes)
}

pub fn retrieve_f32(buf: &[u8], offset: usize) -> Result<f32> {
    retrieve_u32(buf, offset).map(f32::from_bits)
}

pub fn retrieve_f64(buf: &[u8], offset: usize) -> Result<f64> {
    retrieve_u64(buf, offset).map(f64::from_bits)
}

/// Any nonzero octet reads as `true`.
pub fn retrieve_bool(buf: &[u8], offset: usize) -> Result<bool> {
    retrieve_u8(buf, offset).map(|b| b != 0)
}

pub fn retrieve_date(buf: &[u8], offset: usize) -> Result<DateTime<Utc>> {
    let millis = retrieve_i64(buf, offset)?;
    Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
        DecodeError::malformed(format!("epoch milliseconds {millis} out of range")).into()
    })
}

/// ISO-8859-1 encoding. Characters above U+00FF become `?`.
pub fn latin1_encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?'))
        .collect()
}

pub fn latin1_decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Upper-case hex rendering, two characters per byte.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

pub fn hex_to_bytes(text: &str) -> Option<Vec<u8>> {
    let compact: String = text.chars().filter(|ch| !ch.is_whitespace()).collect();
    hex::decode(compact).ok()
}

/// Printable ASCII passes through; everything else renders as a space.
pub fn byte_to_ascii(b: u8) -> char {
    if (32..=126).contains(&b) {
        char::from(b)
    } else {
        ' '
    }
}

/// Render up to `limit` bytes as a boxed table, eight bytes per row.
///
/// Each cell shows the offset (decimal and hex), the binary pattern, and the
/// decimal, hex and printable form of the byte:
///
/// ```text
/// +000:00--+001:01--+
/// |01000001|00001010|
/// |065:41:A|010:0a: |
/// +--------+--------+
/// ```
pub fn dump(data: &[u8], limit: usize) -> String {
    let size = data.len().min(limit);
    let mut result = String::new();

    for (row, chunk) in data[..size].chunks(8).enumerate() {
        let mut offsets = String::from("+");
        let mut binary = String::from("|");
        let mut values = String::from("|");
        let mut rule = String::from("+");

        for (col, &b) in chunk.iter().enumerate() {
            let mark = row * 8 + col;
            let _ = write!(offsets, "{mark:03}:{:02x}--+", mark as u8);
            let _ = write!(binary, "{b:08b}|");
            let _ = write!(values, "{b:03}:{b:02x}:{}|", byte_to_ascii(b));
            rule.push_str("--------+");
        }

        for line in [offsets, binary, values, rule] {
            result.push_str(&line);
            result.push('\n');
        }
    }

    result
}
