#![allow(dead_code)]

use std::sync::Mutex;

use lepjpeg_rs::{Direction, Engine, EngineReply};

pub const STATUS_NOT_JPEG: i32 = -1;
pub const STATUS_NO_ROOM: i32 = -2;
pub const STATUS_BAD_MAGIC: i32 = 3;
pub const STATUS_TRUNCATED: i32 = 4;

const MAGIC: [u8; 2] = *b"LP";
const KEY: u8 = 0xA5;

/// Deterministic, lossless stand-in for the Lepton codec.
///
/// Stream layout: `LP`, the JPEG body between SOI and EOI xored with a key,
/// then the body length mod 2^16 (LE). The stream is exactly as long as the
/// JPEG, so it always fits the encode destination.
#[derive(Debug, Default, Clone, Copy)]
pub struct ToyEngine;

impl Engine for ToyEngine {
    fn name(&self) -> &str {
        "toy"
    }

    fn compress(&self, source: &[u8], destination: &mut [u8], _concurrency: i32) -> EngineReply {
        let n = source.len();
        if n < 4 || source[..2] != [0xFF, 0xD8] || source[n - 2..] != [0xFF, 0xD9] {
            return EngineReply::failed(STATUS_NOT_JPEG);
        }
        if destination.len() < n {
            return EngineReply::failed(STATUS_NO_ROOM);
        }

        let body = &source[2..n - 2];
        destination[..2].copy_from_slice(&MAGIC);
        for (out, b) in destination[2..n - 2].iter_mut().zip(body) {
            *out = b ^ KEY;
        }
        destination[n - 2..n].copy_from_slice(&(body.len() as u16).to_le_bytes());
        EngineReply::ok(n as u64)
    }

    fn decompress(&self, source: &[u8], destination: &mut [u8], _concurrency: i32) -> EngineReply {
        let n = source.len();
        if n < 4 || source[..2] != MAGIC {
            return EngineReply::failed(STATUS_BAD_MAGIC);
        }
        let body = &source[2..n - 2];
        if source[n - 2..] != (body.len() as u16).to_le_bytes() {
            return EngineReply::failed(STATUS_TRUNCATED);
        }
        if destination.len() < n {
            return EngineReply::failed(STATUS_NO_ROOM);
        }

        destination[..2].copy_from_slice(&[0xFF, 0xD8]);
        for (out, b) in destination[2..n - 2].iter_mut().zip(body) {
            *out = b ^ KEY;
        }
        destination[n - 2..n].copy_from_slice(&[0xFF, 0xD9]);
        EngineReply::ok(n as u64)
    }
}

/// Fails with `status` in one direction and behaves like `ToyEngine` otherwise.
/// Scribbles into the destination and reports a length even when failing.
pub struct FailingEngine {
    pub direction: Direction,
    pub status: i32,
}

impl FailingEngine {
    fn fail(&self, destination: &mut [u8]) -> EngineReply {
        destination.fill(0xEE);
        EngineReply {
            status: self.status,
            written: destination.len() as u64,
        }
    }
}

impl Engine for FailingEngine {
    fn name(&self) -> &str {
        "failing"
    }

    fn compress(&self, source: &[u8], destination: &mut [u8], concurrency: i32) -> EngineReply {
        match self.direction {
            Direction::Encode => self.fail(destination),
            Direction::Decode => ToyEngine.compress(source, destination, concurrency),
        }
    }

    fn decompress(&self, source: &[u8], destination: &mut [u8], concurrency: i32) -> EngineReply {
        match self.direction {
            Direction::Decode => self.fail(destination),
            Direction::Encode => ToyEngine.decompress(source, destination, concurrency),
        }
    }
}

/// Reports success with one byte more than the destination holds.
pub struct OverreportingEngine {
    pub direction: Direction,
}

impl Engine for OverreportingEngine {
    fn name(&self) -> &str {
        "overreporting"
    }

    fn compress(&self, source: &[u8], destination: &mut [u8], concurrency: i32) -> EngineReply {
        match self.direction {
            Direction::Encode => EngineReply::ok(destination.len() as u64 + 1),
            Direction::Decode => ToyEngine.compress(source, destination, concurrency),
        }
    }

    fn decompress(&self, source: &[u8], destination: &mut [u8], concurrency: i32) -> EngineReply {
        match self.direction {
            Direction::Decode => EngineReply::ok(destination.len() as u64 + 1),
            Direction::Encode => ToyEngine.decompress(source, destination, concurrency),
        }
    }
}

/// Claims success on decode but flips one bit in the middle of the output.
pub struct LossyEngine;

impl Engine for LossyEngine {
    fn name(&self) -> &str {
        "lossy"
    }

    fn compress(&self, source: &[u8], destination: &mut [u8], concurrency: i32) -> EngineReply {
        ToyEngine.compress(source, destination, concurrency)
    }

    fn decompress(&self, source: &[u8], destination: &mut [u8], concurrency: i32) -> EngineReply {
        let reply = ToyEngine.decompress(source, destination, concurrency);
        if reply.status == 0 {
            destination[reply.written as usize / 2] ^= 0x01;
        }
        reply
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Call {
    pub direction: Direction,
    pub source_ptr: usize,
    pub source_len: usize,
    pub destination_len: usize,
    pub concurrency: i32,
}

/// Records every call, then delegates to `ToyEngine`.
#[derive(Default)]
pub struct SpyEngine {
    calls: Mutex<Vec<Call>>,
}

impl SpyEngine {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, direction: Direction, source: &[u8], destination: &[u8], concurrency: i32) {
        self.calls.lock().unwrap().push(Call {
            direction,
            source_ptr: source.as_ptr() as usize,
            source_len: source.len(),
            destination_len: destination.len(),
            concurrency,
        });
    }
}

impl Engine for SpyEngine {
    fn name(&self) -> &str {
        "spy"
    }

    fn compress(&self, source: &[u8], destination: &mut [u8], concurrency: i32) -> EngineReply {
        self.record(Direction::Encode, source, destination, concurrency);
        ToyEngine.compress(source, destination, concurrency)
    }

    fn decompress(&self, source: &[u8], destination: &mut [u8], concurrency: i32) -> EngineReply {
        self.record(Direction::Decode, source, destination, concurrency);
        ToyEngine.decompress(source, destination, concurrency)
    }
}

/// SOI + pseudo-random body + EOI, `len` bytes in total (`len >= 4`).
pub fn sample_jpeg(len: usize, seed: u64) -> Vec<u8> {
    assert!(len >= 4);
    let mut state = seed | 1;
    let mut out = Vec::with_capacity(len);
    out.extend_from_slice(&[0xFF, 0xD8]);
    while out.len() < len - 2 {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        out.push(state as u8);
    }
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}
