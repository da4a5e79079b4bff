//! Reusable command frames and the process-wide frame pool.

use std::mem;
use std::sync::{Mutex, MutexGuard};

use bytes::BytesMut;
use tracing::trace;

/// Initial capacity of a frame's raw buffer.
const INITIAL_RAW_SIZE: usize = 1024; // 1KB

/// Initial capacity of a frame's argument table. More than enough for most
/// commands.
const INITIAL_ARGS_SIZE: usize = 4;

/// Upper bound on frames parked in the pool; buffers beyond it are freed.
const MAX_POOLED: usize = 64;

/// A content view into a frame's raw buffer, CRLF excluded.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
}

/// One parsed RESP command.
///
/// `raw` holds the exact wire bytes of the command, every prefix and CRLF
/// included; each argument is a view into it. Frames come from a
/// process-wide pool and return to it on drop, keeping their buffer
/// capacity across uses.
///
/// Argument views borrow the frame, so anything that must outlive it has
/// to be copied out (see [`Frame::arg_to_vec`]).
#[derive(Debug)]
pub struct Frame {
    raw: BytesMut,
    args: Vec<Span>,
}

static POOL: Mutex<Vec<(BytesMut, Vec<Span>)>> = Mutex::new(Vec::new());

fn pool_lock() -> MutexGuard<'static, Vec<(BytesMut, Vec<Span>)>> {
    POOL.lock().unwrap_or_else(|e| e.into_inner())
}

impl Frame {
    /// Pull a frame from the pool, or allocate a fresh one.
    pub(crate) fn acquire() -> Frame {
        match pool_lock().pop() {
            Some((raw, args)) => {
                let mut frame = Frame { raw, args };
                frame.reset();
                frame
            }
            None => {
                trace!(capacity = INITIAL_RAW_SIZE, "allocating frame");
                Frame {
                    raw: BytesMut::with_capacity(INITIAL_RAW_SIZE),
                    args: Vec::with_capacity(INITIAL_ARGS_SIZE),
                }
            }
        }
    }

    /// The exact wire bytes of the command, prefixes and terminators
    /// included.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// The content bytes of argument `i`, CRLF excluded.
    pub fn arg(&self, i: usize) -> Option<&[u8]> {
        self.args.get(i).map(|s| &self.raw[s.start..s.end])
    }

    /// Iterate over the argument views in order.
    pub fn args(&self) -> impl Iterator<Item = &[u8]> {
        self.args.iter().map(|s| &self.raw[s.start..s.end])
    }

    /// Copy argument `i` out of the frame.
    pub fn arg_to_vec(&self, i: usize) -> Option<Vec<u8>> {
        self.arg(i).map(<[u8]>::to_vec)
    }

    /// Truncate `raw` and the argument table, keeping capacity.
    pub(crate) fn reset(&mut self) {
        self.raw.clear();
        self.args.clear();
    }

    /// Extend `raw` by `n` zeroed bytes. The filled prefix is untouched
    /// and capacity never shrinks.
    pub(crate) fn grow(&mut self, n: usize) {
        let len = self.raw.len();
        self.raw.resize(len + n, 0);
    }

    pub(crate) fn raw_len(&self) -> usize {
        self.raw.len()
    }

    pub(crate) fn append_raw(&mut self, b: &[u8]) {
        self.raw.extend_from_slice(b);
    }

    pub(crate) fn raw_tail(&mut self, from: usize) -> &mut [u8] {
        &mut self.raw[from..]
    }

    pub(crate) fn push_arg(&mut self, start: usize, end: usize) {
        self.args.push(Span { start, end });
    }

    /// Make room for `n` argument entries without ever shrinking.
    pub(crate) fn reserve_args(&mut self, n: usize) {
        if self.args.capacity() < n {
            self.args.reserve(n - self.args.len());
        }
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        let raw = mem::take(&mut self.raw);
        let args = mem::take(&mut self.args);

        let mut pool = pool_lock();
        if pool.len() < MAX_POOLED {
            pool.push((raw, args));
        }
    }
}
