//! The seam between this crate and the Lepton codec.
//!
//! An engine is anything that can run the two byte-oriented entry points of the
//! lepton_jpeg C ABI. The process holds at most one installed engine; it is set
//! once and read-only afterwards.

use std::sync::OnceLock;

use log::info;

use crate::error::TranscodeError;

/// Result of one engine call: status code plus bytes written to the destination.
///
/// Status 0 means success; every other value is engine-defined failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineReply {
    pub status: i32,
    pub written: u64,
}

impl EngineReply {
    pub fn ok(written: u64) -> Self {
        Self { status: 0, written }
    }

    pub fn failed(status: i32) -> Self {
        Self { status, written: 0 }
    }
}

/// Compression engine contract.
///
/// `source` is read-only for the duration of the call. The engine writes at
/// most `destination.len()` bytes and reports how many it wrote. Output must be
/// a pure function of `source`; `concurrency` may only change how the work is
/// scheduled. Implementations must be safe to call from several threads at
/// once, since callers are not serialized.
pub trait Engine: Send + Sync {
    fn name(&self) -> &str;

    /// JPEG -> Lepton.
    fn compress(&self, source: &[u8], destination: &mut [u8], concurrency: i32) -> EngineReply;

    /// Lepton -> JPEG.
    fn decompress(&self, source: &[u8], destination: &mut [u8], concurrency: i32) -> EngineReply;
}

static ENGINE: OnceLock<Box<dyn Engine>> = OnceLock::new();

/// Install the process-wide engine, or return the one already installed.
///
/// Only the first call wins; later calls drop their argument. Concurrent first
/// calls are resolved by `OnceLock`, so exactly one engine is ever observed.
pub fn install<E: Engine + 'static>(engine: E) -> &'static dyn Engine {
    ENGINE
        .get_or_init(|| {
            info!("installing lepton engine `{}`", engine.name());
            Box::new(engine) as Box<dyn Engine>
        })
        .as_ref()
}

/// The installed engine, if any, without triggering default installation.
pub fn installed() -> Option<&'static dyn Engine> {
    ENGINE.get().map(|engine| engine.as_ref())
}

/// The process-wide engine, installing the native one on first use when available.
pub fn global() -> Result<&'static dyn Engine, TranscodeError> {
    match installed() {
        Some(engine) => Ok(engine),
        None => default_engine(),
    }
}

#[cfg(feature = "native")]
fn default_engine() -> Result<&'static dyn Engine, TranscodeError> {
    Ok(install(crate::native::NativeEngine))
}

#[cfg(not(feature = "native"))]
fn default_engine() -> Result<&'static dyn Engine, TranscodeError> {
    Err(TranscodeError::EngineUnavailable)
}
