//! Payload accumulator
//!
//! Collects exactly the number of bytes announced by an `A<len>` status line
//! out of arbitrarily sized reads. Bytes past the boundary are never taken;
//! they stay in the caller's buffer as the start of the trailing status line.

use bytes::{Bytes, BytesMut};

/// Accumulates a declared-length payload across reads
#[derive(Debug)]
pub struct PayloadAccumulator {
    /// Length announced by the status line
    declared: usize,

    /// Bytes still needed before the payload is complete
    remaining: usize,

    /// Fragments collected so far, in arrival order
    fragments: Vec<Bytes>,
}

impl PayloadAccumulator {
    /// Start accumulating a payload of `declared` bytes
    pub fn new(declared: usize) -> Self {
        Self {
            declared,
            remaining: declared,
            fragments: Vec::new(),
        }
    }

    /// Declared payload length
    pub fn declared(&self) -> usize {
        self.declared
    }

    /// Bytes still needed
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Bytes collected so far
    pub fn received(&self) -> usize {
        self.declared - self.remaining
    }

    /// True once `declared` bytes have been collected
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// Move up to `remaining` bytes from the front of `buf` into the payload
    ///
    /// Returns the number of bytes taken. When `buf` holds more than is
    /// needed it is split at the payload boundary and the excess is left in
    /// place.
    pub fn feed(&mut self, buf: &mut BytesMut) -> usize {
        let take = self.remaining.min(buf.len());
        if take > 0 {
            self.fragments.push(buf.split_to(take).freeze());
            self.remaining -= take;
        }
        take
    }

    /// Concatenate the fragments into the finished payload
    ///
    /// Callers check [`is_complete`](Self::is_complete) first; an incomplete
    /// accumulator yields only the bytes collected so far.
    pub fn finish(self) -> Bytes {
        match self.fragments.len() {
            0 => Bytes::new(),
            1 => {
                let mut fragments = self.fragments;
                fragments.pop().unwrap_or_default()
            }
            _ => {
                let mut out = BytesMut::with_capacity(self.declared - self.remaining);
                for fragment in &self.fragments {
                    out.extend_from_slice(fragment);
                }
                out.freeze()
            }
        }
    }
}
