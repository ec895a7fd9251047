//! Binding to the lepton_jpeg shared library.
//!
//! Only compiled with the `native` feature. The library is resolved by the
//! linker (`lepton_jpeg.dll`, `liblepton_jpeg.so` or `liblepton_jpeg.dylib`);
//! point the linker at it with `RUSTFLAGS=-L<dir>` when it is not on the
//! default search path.

use std::os::raw::{c_int, c_uchar};

use crate::engine::{Engine, EngineReply};

#[link(name = "lepton_jpeg")]
unsafe extern "C" {
    fn WrapperCompressImage(
        input_buffer: *const c_uchar,
        input_buffer_size: u64,
        output_buffer: *mut c_uchar,
        output_buffer_size: u64,
        number_of_threads: c_int,
        result_size: *mut u64,
    ) -> i32;

    fn WrapperDecompressImage(
        input_buffer: *const c_uchar,
        input_buffer_size: u64,
        output_buffer: *mut c_uchar,
        output_buffer_size: u64,
        number_of_threads: c_int,
        result_size: *mut u64,
    ) -> i32;
}

type WrapperFn =
    unsafe extern "C" fn(*const c_uchar, u64, *mut c_uchar, u64, c_int, *mut u64) -> i32;

/// Engine backed by the linked lepton_jpeg library.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeEngine;

impl NativeEngine {
    fn call(
        entry: WrapperFn,
        source: &[u8],
        destination: &mut [u8],
        concurrency: i32,
    ) -> EngineReply {
        let mut written: u64 = 0;
        // SAFETY: both pointers come from live slices whose lengths are passed
        // alongside them, `written` outlives the call, and the library does not
        // retain any pointer after returning.
        let status = unsafe {
            entry(
                source.as_ptr(),
                source.len() as u64,
                destination.as_mut_ptr(),
                destination.len() as u64,
                concurrency,
                &mut written,
            )
        };
        EngineReply { status, written }
    }
}

impl Engine for NativeEngine {
    fn name(&self) -> &str {
        crate::constants::ENGINE_LIBRARY_FILE
    }

    fn compress(&self, source: &[u8], destination: &mut [u8], concurrency: i32) -> EngineReply {
        Self::call(WrapperCompressImage, source, destination, concurrency)
    }

    fn decompress(&self, source: &[u8], destination: &mut [u8], concurrency: i32) -> EngineReply {
        Self::call(WrapperDecompressImage, source, destination, concurrency)
    }
}
