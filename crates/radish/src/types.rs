//! RESP data types and decoded reply values.

use bytes::Bytes;

use crate::error::ProtocolError;

/// A RESP data type.
///
/// The discriminant doubles as the first byte of the wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DataType {
    /// `+OK\r\n`
    SimpleString = b'+',
    /// `-ERR message\r\n`
    Error = b'-',
    /// `:1000\r\n`
    Integer = b':',
    /// `$6\r\nfoobar\r\n`
    BulkString = b'$',
    /// `*2\r\n` followed by two element frames
    Array = b'*',
    /// Internal marker for null replies. Nulls travel on the wire as the
    /// null bulk `$-1\r\n`; this byte never does.
    Null = b'_',
}

impl DataType {
    /// Map a wire byte to its data type.
    ///
    /// [`DataType::Null`] is internal-only and never produced here.
    pub fn from_byte(b: u8) -> Option<DataType> {
        match b {
            b'+' => Some(DataType::SimpleString),
            b'-' => Some(DataType::Error),
            b':' => Some(DataType::Integer),
            b'$' => Some(DataType::BulkString),
            b'*' => Some(DataType::Array),
            _ => None,
        }
    }

    /// The wire byte of this data type.
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// One decoded RESP reply value, as returned by
/// [`Reader::read_any`](crate::Reader::read_any).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    SimpleString(String),
    Error(ProtocolError),
    Integer(i64),
    /// A bulk string payload. Binary-safe.
    Bulk(Bytes),
    /// An array header: the element count only. The elements follow as
    /// independent frames on the stream; `-1` is the null array.
    Array(i64),
    /// The null bulk `$-1\r\n`.
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The payload bytes of a bulk string value.
    pub fn as_bulk(&self) -> Option<&Bytes> {
        match self {
            Value::Bulk(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }
}
