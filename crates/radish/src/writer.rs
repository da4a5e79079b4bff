//! Streaming RESP writer.

use std::io::{self, Write};

use bytes::BytesMut;

use crate::encode;
use crate::error::ProtocolError;

/// Output buffer high-water mark; a write that finds the buffer at or past
/// it drains to the sink first.
const WRITE_BUF_SIZE: usize = 4096;

/// Capacity for the decimal form of any 64-bit integer.
const SCRATCH_SIZE: usize = "-9223372036854775808".len();

/// A streaming RESP writer over any byte sink.
///
/// Writes accumulate in an internal buffer until [`flush`](Writer::flush)
/// or until the buffer crosses its high-water mark. The writer holds no
/// connection state and can keep serving after a successful flush.
pub struct Writer<W> {
    sink: W,
    buf: BytesMut,
    /// Scratch for decimal formatting; carries no state between calls.
    scratch: String,
}

impl<W: Write> Writer<W> {
    pub fn new(sink: W) -> Writer<W> {
        Writer {
            sink,
            buf: BytesMut::with_capacity(WRITE_BUF_SIZE),
            scratch: String::with_capacity(SCRATCH_SIZE),
        }
    }

    /// Rebind to a new sink, discarding any unflushed output.
    pub fn reset(&mut self, sink: W) {
        self.sink = sink;
        self.buf.clear();
        self.scratch.clear();
    }

    /// Write any buffered data through to the sink.
    pub fn flush(&mut self) -> io::Result<()> {
        self.drain()?;
        self.sink.flush()
    }

    /// Write a RESP simple string, escaping CR and LF.
    pub fn write_simple_string(&mut self, s: &str) -> io::Result<()> {
        self.make_room()?;
        encode::append_simple_string(&mut self.buf, s);
        Ok(())
    }

    /// Write a RESP error.
    pub fn write_error(&mut self, e: &ProtocolError) -> io::Result<()> {
        self.write_raw_error(&e.kind, &e.msg)
    }

    /// Write the kind and msg as a RESP error. An empty kind is
    /// substituted with `ERR`; both parts are escaped.
    pub fn write_raw_error(&mut self, kind: &str, msg: &str) -> io::Result<()> {
        self.make_room()?;
        encode::append_error(&mut self.buf, kind, msg);
        Ok(())
    }

    /// Write a RESP integer.
    pub fn write_int(&mut self, i: i64) -> io::Result<()> {
        self.make_room()?;
        encode::append_int(&mut self.buf, &mut self.scratch, i);
        Ok(())
    }

    /// Write a RESP integer from a 32-bit value.
    pub fn write_int32(&mut self, i: i32) -> io::Result<()> {
        self.write_int(i64::from(i))
    }

    /// Write a RESP integer from an unsigned value.
    pub fn write_uint(&mut self, u: u64) -> io::Result<()> {
        self.make_room()?;
        encode::append_uint(&mut self.buf, &mut self.scratch, u);
        Ok(())
    }

    /// Write a RESP integer from a 32-bit unsigned value.
    pub fn write_uint32(&mut self, u: u32) -> io::Result<()> {
        self.write_uint(u64::from(u))
    }

    /// Write a RESP bulk string.
    pub fn write_string(&mut self, s: &str) -> io::Result<()> {
        self.write_bytes(s.as_bytes())
    }

    /// Write a RESP bulk string from raw bytes, verbatim.
    pub fn write_bytes(&mut self, b: &[u8]) -> io::Result<()> {
        self.make_room()?;
        encode::append_bulk(&mut self.buf, &mut self.scratch, b);
        Ok(())
    }

    /// Write the RESP null, `$-1\r\n`.
    pub fn write_null(&mut self) -> io::Result<()> {
        self.make_room()?;
        encode::append_null(&mut self.buf);
        Ok(())
    }

    /// Write a RESP array header of `n` elements. The caller writes the
    /// `n` element frames after; `-1` is the null array.
    pub fn write_array(&mut self, n: i64) -> io::Result<()> {
        self.make_room()?;
        encode::append_array(&mut self.buf, &mut self.scratch, n);
        Ok(())
    }

    fn make_room(&mut self) -> io::Result<()> {
        if self.buf.len() >= WRITE_BUF_SIZE {
            self.drain()?;
        }
        Ok(())
    }

    fn drain(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            self.sink.write_all(&self.buf)?;
            self.buf.clear();
        }
        Ok(())
    }
}
