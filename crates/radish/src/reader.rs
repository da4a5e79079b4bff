//! Streaming RESP reader.

use std::io::{self, BufRead, BufReader, Read};

use bytes::Bytes;
use tracing::trace;

use crate::error::{ProtocolError, RespError};
use crate::frame::Frame;
use crate::types::{DataType, Value};
use crate::utils::{has_terminator, parse_int, CRLF};

/// Length of the longest valid length line: `:-9223372036854775808\r\n`.
const MAX_VALUE_LINE: usize = 23;

/// Outcome of a failed line read, before the caller rewrites it.
enum LineError {
    /// The line ran past its byte limit without a terminator.
    LimitExceeded,
    /// A hard failure that propagates unchanged.
    Fatal(RespError),
}

impl From<LineError> for RespError {
    fn from(e: LineError) -> RespError {
        match e {
            LineError::Fatal(err) => err,
            LineError::LimitExceeded => ProtocolError::new("ERR", "line limit exceeded").into(),
        }
    }
}

/// Outcome of a failed length-line read. `Invalid` is rewritten to the
/// canonical protocol error of whichever frame was being parsed.
enum ValueError {
    Invalid,
    Fatal(RespError),
}

/// A streaming RESP reader over any byte source.
///
/// One instance serves one caller; distinct readers on distinct sources
/// may run in parallel, all borrowing frames from the shared pool.
pub struct Reader<R> {
    r: BufReader<R>,
}

impl<R: Read> Reader<R> {
    pub fn new(source: R) -> Reader<R> {
        Reader {
            r: BufReader::new(source),
        }
    }

    /// Discard any buffered data and switch to reading from `source`.
    pub fn reset(&mut self, source: R) {
        self.r = BufReader::new(source);
    }

    /// Read one command in array-of-bulks form.
    ///
    /// Commands with a non-positive element count are heartbeat noise and
    /// are skipped; the next real command is returned. The frame goes back
    /// to the pool when dropped, so arguments that must outlive it have to
    /// be copied out.
    pub fn read_command(&mut self) -> Result<Frame, RespError> {
        let mut frame = Frame::acquire();

        let count = loop {
            let n = match self.read_value(DataType::Array, &mut frame) {
                Ok(n) => n,
                Err(ValueError::Invalid) => {
                    return Err(ProtocolError::invalid_multibulk_length().into());
                }
                Err(ValueError::Fatal(err)) => return Err(err),
            };
            if n > 0 {
                break n as usize;
            }
            frame.reset();
        };

        frame.reserve_args(count);
        for _ in 0..count {
            match self.read_bulk(&mut frame)? {
                Some((start, end)) => frame.push_arg(start, end),
                None => return Err(ProtocolError::invalid_bulk_length().into()),
            }
        }

        trace!(args = frame.len(), raw = frame.raw().len(), "read command");
        Ok(frame)
    }

    /// Read a RESP simple string.
    ///
    /// The line has no byte limit; a peer that never sends the CRLF can
    /// grow the frame without bound.
    pub fn read_simple_string(&mut self) -> Result<String, RespError> {
        let mut frame = Frame::acquire();
        let (start, end) = self
            .read_line(DataType::SimpleString, 0, &mut frame)
            .map_err(RespError::from)?;
        Ok(String::from_utf8_lossy(&frame.raw()[start..end]).into_owned())
    }

    /// Read a RESP error.
    ///
    /// The first word after the `-`, up to the first space or LF, is the
    /// error kind; everything after the split is the message.
    pub fn read_error(&mut self) -> Result<ProtocolError, RespError> {
        let mut frame = Frame::acquire();
        let (start, end) = self
            .read_line(DataType::Error, 0, &mut frame)
            .map_err(RespError::from)?;
        let line = &frame.raw()[start..end];

        let err = match line.iter().position(|&b| b == b' ' || b == b'\n') {
            None => ProtocolError::new(String::from_utf8_lossy(line).into_owned(), ""),
            Some(i) => ProtocolError::new(
                String::from_utf8_lossy(&line[..i]).into_owned(),
                String::from_utf8_lossy(&line[i + 1..]).into_owned(),
            ),
        };
        Ok(err)
    }

    /// Read a RESP integer.
    pub fn read_integer(&mut self) -> Result<i64, RespError> {
        let mut frame = Frame::acquire();
        match self.read_value(DataType::Integer, &mut frame) {
            Ok(n) => Ok(n),
            Err(ValueError::Invalid) => Err(ProtocolError::invalid_integer_value().into()),
            Err(ValueError::Fatal(err)) => Err(err),
        }
    }

    /// Read a RESP bulk string; `None` is the null bulk.
    pub fn read_string(&mut self) -> Result<Option<Bytes>, RespError> {
        let mut frame = Frame::acquire();
        let bulk = self.read_bulk(&mut frame)?;
        Ok(bulk.map(|(start, end)| Bytes::copy_from_slice(&frame.raw()[start..end])))
    }

    /// Read a RESP array header, returning the element count.
    ///
    /// The count may be `-1` for the null array; the elements follow as
    /// independent frames.
    pub fn read_array(&mut self) -> Result<i64, RespError> {
        let mut frame = Frame::acquire();
        match self.read_value(DataType::Array, &mut frame) {
            Ok(n) => Ok(n),
            Err(ValueError::Invalid) => Err(ProtocolError::invalid_multibulk_length().into()),
            Err(ValueError::Fatal(err)) => Err(err),
        }
    }

    /// Read any RESP value, dispatching on the first byte.
    ///
    /// A null bulk comes back as `(DataType::Null, Value::Null)`.
    pub fn read_any(&mut self) -> Result<(DataType, Value), RespError> {
        let first = {
            let buf = self.r.fill_buf()?;
            match buf.first() {
                Some(&b) => b,
                None => return Err(RespError::EndOfStream),
            }
        };

        match DataType::from_byte(first) {
            Some(DataType::SimpleString) => {
                let s = self.read_simple_string()?;
                Ok((DataType::SimpleString, Value::SimpleString(s)))
            }
            Some(DataType::Error) => {
                let e = self.read_error()?;
                Ok((DataType::Error, Value::Error(e)))
            }
            Some(DataType::Integer) => {
                let i = self.read_integer()?;
                Ok((DataType::Integer, Value::Integer(i)))
            }
            Some(DataType::BulkString) => match self.read_string()? {
                Some(b) => Ok((DataType::BulkString, Value::Bulk(b))),
                None => Ok((DataType::Null, Value::Null)),
            },
            Some(DataType::Array) => {
                let n = self.read_array()?;
                Ok((DataType::Array, Value::Array(n)))
            }
            // Null is internal-only; nulls arrive as bulk strings.
            Some(DataType::Null) | None => Err(ProtocolError::new(
                "ERR",
                format!(
                    "Protocol error, got {:?} as reply type byte",
                    (first as char).to_string()
                ),
            )
            .into()),
        }
    }

    /// Read a CRLF-terminated line starting with the discriminant `dt`
    /// into the frame, returning the span between the discriminant and
    /// the CR.
    ///
    /// `limit` bounds the bytes this call may append; 0 means unbounded.
    /// Each turn takes the buffered slice up to the next LF, or all of it
    /// when no LF is buffered yet, so memory use tracks the limit rather
    /// than the input.
    fn read_line(
        &mut self,
        dt: DataType,
        limit: usize,
        frame: &mut Frame,
    ) -> Result<(usize, usize), LineError> {
        let start = frame.raw_len();

        let mut appended = 0;
        while limit == 0 || appended < limit {
            let (taken, saw_lf) = {
                let buf = self.r.fill_buf().map_err(|e| LineError::Fatal(e.into()))?;
                if buf.is_empty() {
                    let err = if start == 0 && frame.raw_len() == 0 {
                        RespError::EndOfStream
                    } else {
                        io::Error::from(io::ErrorKind::UnexpectedEof).into()
                    };
                    return Err(LineError::Fatal(err));
                }

                match buf.iter().position(|&b| b == b'\n') {
                    Some(i) => {
                        frame.append_raw(&buf[..=i]);
                        (i + 1, true)
                    }
                    None => {
                        frame.append_raw(buf);
                        (buf.len(), false)
                    }
                }
            };
            self.r.consume(taken);
            appended += taken;

            // A bare LF does not terminate the line; only a CRLF pair
            // does, even when the CR arrived in an earlier fragment.
            if saw_lf && has_terminator(&frame.raw()[start..]) {
                break;
            }
        }

        if !has_terminator(&frame.raw()[start..]) {
            return Err(LineError::LimitExceeded);
        }

        let got = frame.raw()[start];
        if got != dt.as_byte() {
            return Err(LineError::Fatal(
                ProtocolError::new(
                    "ERR",
                    format!("expected '{}', got '{}'", dt.as_byte() as char, got as char),
                )
                .into(),
            ));
        }

        Ok((start + 1, frame.raw_len() - CRLF.len()))
    }

    /// Read a length line of the given data type and parse its payload as
    /// a signed decimal.
    fn read_value(&mut self, dt: DataType, frame: &mut Frame) -> Result<i64, ValueError> {
        let (start, end) = self
            .read_line(dt, MAX_VALUE_LINE, frame)
            .map_err(|e| match e {
                LineError::LimitExceeded => ValueError::Invalid,
                LineError::Fatal(err) => ValueError::Fatal(err),
            })?;

        parse_int(&frame.raw()[start..end]).ok_or(ValueError::Invalid)
    }

    /// Read a full bulk string, prefix and terminator included, returning
    /// the span over the content bytes or `None` for the null bulk.
    fn read_bulk(&mut self, frame: &mut Frame) -> Result<Option<(usize, usize)>, RespError> {
        let length = match self.read_value(DataType::BulkString, frame) {
            Ok(n) => n,
            Err(ValueError::Invalid) => {
                return Err(ProtocolError::invalid_bulk_length().into());
            }
            Err(ValueError::Fatal(err)) => return Err(err),
        };
        if length < 0 {
            return Ok(None);
        }

        let start = frame.raw_len();
        frame.grow(length as usize + CRLF.len());

        let mut filled = start;
        while filled < frame.raw_len() {
            let n = self.r.read(frame.raw_tail(filled))?;
            if n == 0 {
                return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
            }
            filled += n;
        }

        if !has_terminator(frame.raw()) {
            return Err(ProtocolError::invalid_bulk_length().into());
        }

        Ok(Some((start, frame.raw_len() - CRLF.len())))
    }
}
