//! One engine call per direction, with status and length checking.

use std::fmt;
use std::num::NonZeroU32;

use log::debug;

use crate::buffer::{CallArena, Direction, destination_capacity};
use crate::constants::DEFAULT_CONCURRENCY;
use crate::engine::{self, Engine};
use crate::error::{EngineFault, TranscodeError};

/// Positive thread-count hint forwarded to the engine.
///
/// The engine ABI takes a signed 32-bit value, so the upper bound is `i32::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Concurrency(NonZeroU32);

impl Concurrency {
    pub fn new(threads: u32) -> Result<Self, TranscodeError> {
        NonZeroU32::new(threads)
            .filter(|n| n.get() <= i32::MAX as u32)
            .map(Self)
            .ok_or(TranscodeError::InvalidConcurrency(i64::from(threads)))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    fn as_ffi(self) -> i32 {
        // Bounded by the constructor.
        self.0.get() as i32
    }
}

impl Default for Concurrency {
    fn default() -> Self {
        Self(NonZeroU32::new(DEFAULT_CONCURRENCY).unwrap_or(NonZeroU32::MIN))
    }
}

impl TryFrom<i64> for Concurrency {
    type Error = TranscodeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map_err(|_| TranscodeError::InvalidConcurrency(value))
            .and_then(Self::new)
    }
}

impl fmt::Display for Concurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inputs to a single engine invocation; lives only for that call.
#[derive(Debug, Clone, Copy)]
pub struct TranscodeRequest<'a> {
    pub source: &'a [u8],
    pub concurrency: Concurrency,
}

/// Runs encode/decode against one engine.
///
/// Holds nothing but a shared reference, so a `Transcoder` can be copied freely
/// and used from several threads; each call owns its own buffers.
#[derive(Clone, Copy)]
pub struct Transcoder<'e> {
    engine: &'e dyn Engine,
}

impl<'e> Transcoder<'e> {
    pub fn new(engine: &'e dyn Engine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &'e dyn Engine {
        self.engine
    }

    /// JPEG bytes to a Lepton stream no longer than the input.
    pub fn encode(
        &self,
        image: &[u8],
        concurrency: Concurrency,
    ) -> Result<Vec<u8>, TranscodeError> {
        self.invoke(
            Direction::Encode,
            TranscodeRequest {
                source: image,
                concurrency,
            },
        )
    }

    /// Lepton stream back to the original JPEG bytes.
    pub fn decode(
        &self,
        stream: &[u8],
        concurrency: Concurrency,
    ) -> Result<Vec<u8>, TranscodeError> {
        self.invoke(
            Direction::Decode,
            TranscodeRequest {
                source: stream,
                concurrency,
            },
        )
    }

    pub fn invoke(
        &self,
        direction: Direction,
        request: TranscodeRequest<'_>,
    ) -> Result<Vec<u8>, TranscodeError> {
        let capacity = destination_capacity(direction, request.source.len());
        debug!(
            "lepton {}: {} source bytes, {} byte destination, concurrency {}",
            direction,
            request.source.len(),
            capacity,
            request.concurrency
        );

        let mut arena = CallArena::new(request.source, capacity);
        let reply = {
            let (source, destination) = arena.split();
            let threads = request.concurrency.as_ffi();
            match direction {
                Direction::Encode => self.engine.compress(source, destination, threads),
                Direction::Decode => self.engine.decompress(source, destination, threads),
            }
        };
        debug!(
            "lepton {}: engine `{}` returned status {} with {} bytes",
            direction,
            self.engine.name(),
            reply.status,
            reply.written
        );

        if reply.status != 0 {
            return Err(TranscodeError::EngineFailure {
                direction,
                fault: EngineFault::Status(reply.status),
            });
        }

        arena
            .into_output(reply.written)
            .map_err(|fault| TranscodeError::EngineFailure { direction, fault })
    }
}

impl Transcoder<'static> {
    /// Transcoder over the process-wide engine.
    pub fn global() -> Result<Self, TranscodeError> {
        engine::global().map(Self::new)
    }
}

impl fmt::Debug for Transcoder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transcoder")
            .field("engine", &self.engine.name())
            .finish()
    }
}
