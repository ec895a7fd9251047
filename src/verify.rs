//! Round-trip certification.

use log::{debug, warn};

use crate::digest::Digest128;
use crate::error::TranscodeError;
use crate::transcode::{Concurrency, Transcoder};

/// A Lepton stream proven to decode back to its source JPEG.
///
/// The only constructor is `Transcoder::encode_and_verify`, after the decoded
/// bytes have been hashed and compared, so holding one is the proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedArtifact {
    data: Vec<u8>,
    source_digest: Digest128,
}

impl VerifiedArtifact {
    /// The verified Lepton stream.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Digest of the original JPEG.
    pub fn source_digest(&self) -> Digest128 {
        self.source_digest
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_parts(self) -> (Vec<u8>, Digest128) {
        (self.data, self.source_digest)
    }

    /// Decode the stream and check it against the recorded source digest.
    pub fn restore(
        &self,
        transcoder: &Transcoder<'_>,
        concurrency: Concurrency,
    ) -> Result<Vec<u8>, TranscodeError> {
        transcoder.decode_and_check(&self.data, self.source_digest, concurrency)
    }
}

impl Transcoder<'_> {
    /// Encode, decode the result, and seal it only if the bytes come back identical.
    ///
    /// Costs two full engine calls.
    pub fn encode_and_verify(
        &self,
        image: &[u8],
        concurrency: Concurrency,
    ) -> Result<VerifiedArtifact, TranscodeError> {
        let stream = self.encode(image, concurrency)?;
        let reconstructed = self.decode(&stream, concurrency)?;

        let source_digest = Digest128::of(image);
        ensure_digest(source_digest, &reconstructed)?;
        debug!(
            "lepton round trip verified: {} -> {} bytes, digest {}",
            image.len(),
            stream.len(),
            source_digest
        );

        Ok(VerifiedArtifact {
            data: stream,
            source_digest,
        })
    }

    /// Decode a stream and require the output to hash to `expected`.
    pub fn decode_and_check(
        &self,
        stream: &[u8],
        expected: Digest128,
        concurrency: Concurrency,
    ) -> Result<Vec<u8>, TranscodeError> {
        let image = self.decode(stream, concurrency)?;
        ensure_digest(expected, &image)?;
        Ok(image)
    }
}

fn ensure_digest(expected: Digest128, reconstructed: &[u8]) -> Result<(), TranscodeError> {
    let actual = Digest128::of(reconstructed);
    if actual != expected {
        warn!(
            "lepton round trip mismatch: expected {}, got {} ({} bytes)",
            expected,
            actual,
            reconstructed.len()
        );
        return Err(TranscodeError::IntegrityMismatch { expected, actual });
    }
    Ok(())
}
