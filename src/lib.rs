//! Verified lossless transcoding between JPEG and Lepton.
//!
//! The Lepton codec itself is an external engine reached through the
//! [`engine::Engine`] trait. This crate sizes the buffers, runs the calls,
//! turns status codes into [`TranscodeError`]s and certifies round trips with a
//! 128-bit digest.

#![cfg_attr(not(feature = "native"), forbid(unsafe_code))]

pub mod buffer;
pub mod constants;
pub mod digest;
pub mod engine;
pub mod error;
#[cfg(feature = "native")]
pub mod native;
pub mod transcode;
pub mod verify;

pub use buffer::Direction;
pub use digest::Digest128;
pub use engine::{Engine, EngineReply};
pub use error::{EngineFault, TranscodeError};
pub use transcode::{Concurrency, TranscodeRequest, Transcoder};
pub use verify::VerifiedArtifact;

/// Encode a JPEG with the process-wide engine.
pub fn encode(image: &[u8], concurrency: Concurrency) -> Result<Vec<u8>, TranscodeError> {
    Transcoder::global()?.encode(image, concurrency)
}

/// Decode a Lepton stream with the process-wide engine.
pub fn decode(stream: &[u8], concurrency: Concurrency) -> Result<Vec<u8>, TranscodeError> {
    Transcoder::global()?.decode(stream, concurrency)
}

/// Encode and certify the round trip with the process-wide engine.
pub fn encode_and_verify(
    image: &[u8],
    concurrency: Concurrency,
) -> Result<VerifiedArtifact, TranscodeError> {
    Transcoder::global()?.encode_and_verify(image, concurrency)
}

/// Decode with the process-wide engine and require the output to match `expected`.
pub fn decode_and_check(
    stream: &[u8],
    expected: Digest128,
    concurrency: Concurrency,
) -> Result<Vec<u8>, TranscodeError> {
    Transcoder::global()?.decode_and_check(stream, expected, concurrency)
}
