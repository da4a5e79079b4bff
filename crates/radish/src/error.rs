//! Error types surfaced by the codec.

use thiserror::Error;

/// A structured RESP error value.
///
/// `kind` is the first word of the error line (`ERR`, `WRONGTYPE`,
/// `WRONGPASS`, ...); `msg` is everything after it. Both may be empty when
/// decoded from a degenerate reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("radish: {} {}", or_nil(.kind), or_nil(.msg))]
pub struct ProtocolError {
    pub kind: String,
    pub msg: String,
}

fn or_nil(s: &str) -> &str {
    if s.is_empty() { "<nil>" } else { s }
}

impl ProtocolError {
    /// Create an error with the given kind and message, stored verbatim.
    pub fn new(kind: impl Into<String>, msg: impl Into<String>) -> ProtocolError {
        ProtocolError {
            kind: kind.into(),
            msg: msg.into(),
        }
    }

    /// `ERR Protocol error: invalid multibulk length`
    pub fn invalid_multibulk_length() -> ProtocolError {
        ProtocolError::new("ERR", "Protocol error: invalid multibulk length")
    }

    /// `ERR Protocol error: invalid bulk length`
    pub fn invalid_bulk_length() -> ProtocolError {
        ProtocolError::new("ERR", "Protocol error: invalid bulk length")
    }

    /// `ERR Protocol error: invalid integer value`
    pub fn invalid_integer_value() -> ProtocolError {
        ProtocolError::new("ERR", "Protocol error: invalid integer value")
    }
}

/// Any failure a codec operation can surface.
///
/// Transport errors pass through unchanged; a cleanly drained source at a
/// frame boundary is the distinguished [`EndOfStream`] sentinel; everything
/// the peer did wrong is a [`ProtocolError`]. The codec never recovers from
/// any of these internally.
///
/// [`EndOfStream`]: RespError::EndOfStream
#[derive(Debug, Error)]
pub enum RespError {
    /// An error from the underlying source or sink.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The source ran out of bytes between frames.
    ///
    /// Running dry in the middle of a frame is not clean and surfaces as
    /// [`RespError::Io`] with [`std::io::ErrorKind::UnexpectedEof`].
    #[error("end of stream")]
    EndOfStream,

    /// The peer violated the RESP framing rules.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl RespError {
    /// True for the clean end-of-stream sentinel.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, RespError::EndOfStream)
    }
}
