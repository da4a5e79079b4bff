//! Append-style RESP encoders.
//!
//! Free functions that append one wire form to a caller-owned buffer. The
//! [`Writer`](crate::Writer) wraps these with buffered output; callers that
//! batch replies into their own `BytesMut` can use them directly.
//!
//! The integer-bearing forms take a `scratch` string used for decimal
//! formatting; it is cleared on entry and may be reused across calls.

use std::fmt::Write as _;

use bytes::{BufMut, BytesMut};

use crate::types::DataType;
use crate::utils::CRLF;

/// Append a RESP simple string: `+<s>\r\n`, with CR/LF escaped.
pub fn append_simple_string(buf: &mut BytesMut, s: &str) {
    buf.put_u8(DataType::SimpleString.as_byte());
    append_line(buf, s);
    buf.put_slice(CRLF);
}

/// Append a RESP error: `-<kind>[ <msg>]\r\n`, with CR/LF escaped.
///
/// An empty kind is substituted with `ERR`.
pub fn append_error(buf: &mut BytesMut, kind: &str, msg: &str) {
    let kind = if kind.is_empty() { "ERR" } else { kind };

    buf.put_u8(DataType::Error.as_byte());
    append_line(buf, kind);
    if !msg.is_empty() {
        buf.put_u8(b' ');
        append_line(buf, msg);
    }
    buf.put_slice(CRLF);
}

/// Append a RESP integer: `:<i>\r\n`.
pub fn append_int(buf: &mut BytesMut, scratch: &mut String, i: i64) {
    buf.put_u8(DataType::Integer.as_byte());
    if (0..=9).contains(&i) {
        buf.put_u8(b'0' + i as u8);
    } else {
        append_decimal(buf, scratch, i);
    }
    buf.put_slice(CRLF);
}

/// Append a RESP integer from an unsigned value: `:<u>\r\n`.
pub fn append_uint(buf: &mut BytesMut, scratch: &mut String, u: u64) {
    buf.put_u8(DataType::Integer.as_byte());
    if u <= 9 {
        buf.put_u8(b'0' + u as u8);
    } else {
        scratch.clear();
        let _ = write!(scratch, "{u}");
        buf.put_slice(scratch.as_bytes());
    }
    buf.put_slice(CRLF);
}

/// Append a RESP bulk string: `$<len>\r\n<b>\r\n`. The payload is written
/// verbatim; bulk strings are binary-safe.
pub fn append_bulk(buf: &mut BytesMut, scratch: &mut String, b: &[u8]) {
    append_prefix(buf, scratch, DataType::BulkString, b.len() as i64);
    buf.put_slice(b);
    buf.put_slice(CRLF);
}

/// Append the RESP null: the fixed five bytes `$-1\r\n`.
pub fn append_null(buf: &mut BytesMut) {
    buf.put_slice(b"$-1\r\n");
}

/// Append a RESP array header: `*<n>\r\n`. The `n` element frames follow
/// separately; `-1` is the null array.
pub fn append_array(buf: &mut BytesMut, scratch: &mut String, n: i64) {
    append_prefix(buf, scratch, DataType::Array, n);
}

fn append_prefix(buf: &mut BytesMut, scratch: &mut String, dt: DataType, n: i64) {
    buf.put_u8(dt.as_byte());
    if (0..=9).contains(&n) {
        buf.put_u8(b'0' + n as u8);
    } else {
        append_decimal(buf, scratch, n);
    }
    buf.put_slice(CRLF);
}

fn append_decimal(buf: &mut BytesMut, scratch: &mut String, i: i64) {
    scratch.clear();
    // Formatting an integer into a String cannot fail.
    let _ = write!(scratch, "{i}");
    buf.put_slice(scratch.as_bytes());
}

/// Simple strings and errors are line-oriented and cannot carry a literal
/// CR or LF. One scan decides; the escaping pass runs only when needed.
fn append_line(buf: &mut BytesMut, s: &str) {
    if !s.bytes().any(|b| b == b'\r' || b == b'\n') {
        buf.put_slice(s.as_bytes());
        return;
    }

    for b in s.bytes() {
        match b {
            b'\r' => buf.put_slice(b"\\r"),
            b'\n' => buf.put_slice(b"\\n"),
            _ => buf.put_u8(b),
        }
    }
}
