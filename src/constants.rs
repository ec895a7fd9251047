/// Concurrency hint passed to the engine when the caller does not choose one.
pub const DEFAULT_CONCURRENCY: u32 = 4;

/// Smallest destination buffer handed to the engine when decoding.
///
/// Tiny Lepton streams would otherwise get a destination sized by the expansion
/// factor alone, which is far too small for the JPEG headers they carry.
pub const DECODE_CAPACITY_FLOOR: usize = 128_000;

/// Multiplier applied to the Lepton stream length to size the decode destination.
pub const DECODE_EXPANSION_FACTOR: usize = 3;

/// Size in bytes of a `Digest128`.
pub const DIGEST_LEN: usize = 16;

// Name of the engine library the `native` feature links against, per platform.
#[cfg(target_os = "windows")]
pub const ENGINE_LIBRARY_FILE: &str = "lepton_jpeg.dll";
#[cfg(target_os = "macos")]
pub const ENGINE_LIBRARY_FILE: &str = "liblepton_jpeg.dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const ENGINE_LIBRARY_FILE: &str = "liblepton_jpeg.so";
