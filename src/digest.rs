//! 128-bit content fingerprint used to certify round trips.

use std::fmt;
use std::str::FromStr;

use crate::constants::DIGEST_LEN;
use crate::error::TranscodeError;

/// 128-bit digest of a byte sequence.
///
/// BLAKE3 in extendable-output mode, cut to 16 bytes. Only equality is
/// meaningful to callers; collisions are not handled.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest128([u8; DIGEST_LEN]);

impl Digest128 {
    pub fn of(data: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(data);
        let mut out = [0u8; DIGEST_LEN];
        hasher.finalize_xof().fill(&mut out);
        Self(out)
    }

    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(text: &str) -> Result<Self, TranscodeError> {
        let mut out = [0u8; DIGEST_LEN];
        hex::decode_to_slice(text.trim(), &mut out)
            .map_err(|_| TranscodeError::InvalidDigest(text.to_string()))?;
        Ok(Self(out))
    }
}

impl FromStr for Digest128 {
    type Err = TranscodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Digest128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest128({})", self.to_hex())
    }
}
