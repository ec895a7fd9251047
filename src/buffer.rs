//! Destination sizing and per-call working memory.
//!
//! The engine writes into a caller-provided buffer and only reports the real
//! output length afterwards, so every call over-allocates and then copies the
//! written prefix out into a right-sized vector.

use std::fmt;

use crate::constants::{DECODE_CAPACITY_FLOOR, DECODE_EXPANSION_FACTOR};
use crate::error::EngineFault;

/// Which way a transcode runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// JPEG -> Lepton.
    Encode,
    /// Lepton -> JPEG.
    Decode,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encode => f.write_str("encode"),
            Direction::Decode => f.write_str("decode"),
        }
    }
}

/// Capacity of the destination buffer handed to the engine for an input of `input_len` bytes.
///
/// Encoding assumes Lepton never expands a JPEG; an engine that needs more room
/// has to report failure. Decoding reserves three times the stream length with a
/// fixed floor. The result is never zero.
pub fn destination_capacity(direction: Direction, input_len: usize) -> usize {
    let capacity = match direction {
        Direction::Encode => input_len,
        Direction::Decode => input_len
            .saturating_mul(DECODE_EXPANSION_FACTOR)
            .max(DECODE_CAPACITY_FLOOR),
    };
    capacity.max(1)
}

/// One allocation per engine call holding a private copy of the source followed
/// by the destination region.
///
/// The caller's bytes are never aliased into engine-visible memory, and the
/// over-allocated tail never leaves this type: `into_output` copies out exactly
/// the bytes the engine reported and drops the rest.
pub struct CallArena {
    buf: Vec<u8>,
    source_len: usize,
}

impl CallArena {
    pub fn new(source: &[u8], capacity: usize) -> Self {
        // Totals beyond isize::MAX abort in the allocator.
        let mut buf = vec![0u8; source.len().saturating_add(capacity)];
        buf[..source.len()].copy_from_slice(source);
        Self {
            buf,
            source_len: source.len(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len() - self.source_len
    }

    /// Source copy and writable destination, borrowed for the duration of one engine call.
    pub fn split(&mut self) -> (&[u8], &mut [u8]) {
        let (source, destination) = self.buf.split_at_mut(self.source_len);
        (source, destination)
    }

    /// Copy out the first `written` destination bytes, releasing the arena.
    pub fn into_output(self, written: u64) -> Result<Vec<u8>, EngineFault> {
        let capacity = self.capacity();
        let len = usize::try_from(written)
            .ok()
            .filter(|&len| len <= capacity)
            .ok_or(EngineFault::Overrun {
                reported: written,
                capacity,
            })?;
        let start = self.source_len;
        Ok(self.buf[start..start + len].to_vec())
    }
}
