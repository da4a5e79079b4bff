//! # radish
//!
//! A streaming RESP2 (REdis Serialization Protocol) codec: a buffered
//! [`Reader`] that parses pipelined command frames and typed reply values
//! from any byte source, and a buffered [`Writer`] that serializes the
//! same frames to any byte sink.
//!
//! ## Features
//!
//! - **Exact wire bytes**: every parsed command keeps its full on-wire
//!   form in [`Frame::raw`] for replay and introspection
//! - **Zero-copy arguments**: [`Frame::arg`] views point into the raw
//!   buffer, with their lifetime enforced by the borrow checker
//! - **Pooled frames**: a process-wide, thread-safe pool amortizes
//!   allocations across requests
//! - **Bounded parsing**: length lines are capped, bulk contents are
//!   bounded by their declared length
//!
//! ## Example
//!
//! ```rust
//! use radish::{Reader, Writer};
//!
//! # fn main() -> Result<(), radish::RespError> {
//! let mut wire = Vec::new();
//!
//! let mut writer = Writer::new(&mut wire);
//! writer.write_array(2)?;
//! writer.write_string("GET")?;
//! writer.write_string("mykey")?;
//! writer.flush()?;
//! drop(writer);
//!
//! let mut reader = Reader::new(wire.as_slice());
//! let frame = reader.read_command()?;
//! assert_eq!(frame.arg(0), Some(&b"GET"[..]));
//! assert_eq!(frame.arg(1), Some(&b"mykey"[..]));
//! assert_eq!(frame.raw(), &wire[..]);
//! # Ok(())
//! # }
//! ```

mod encode;
mod error;
mod frame;
mod reader;
mod types;
mod utils;
mod writer;

pub use encode::{
    append_array, append_bulk, append_error, append_int, append_null, append_simple_string,
    append_uint,
};
pub use error::{ProtocolError, RespError};
pub use frame::Frame;
pub use reader::Reader;
pub use types::{DataType, Value};
pub use writer::Writer;
