//! Python bindings for lepjpeg-rs using PyO3.

use std::sync::Once;

use log::LevelFilter;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyBytes;

use lepjpeg_rs::{Concurrency, Digest128, TranscodeError, Transcoder, VerifiedArtifact};

/// A Lepton stream whose round trip back to the source JPEG has been checked.
#[pyclass]
struct VerifiedLep {
    artifact: VerifiedArtifact,
}

#[pymethods]
impl VerifiedLep {
    /// Lepton bytes.
    #[getter]
    fn data(&self, py: Python<'_>) -> Py<PyBytes> {
        PyBytes::new(py, self.artifact.data()).into()
    }

    /// Hex digest of the source JPEG.
    #[getter]
    fn jpeghash(&self) -> String {
        self.artifact.source_digest().to_hex()
    }

    /// Raw 16-byte digest of the source JPEG.
    #[getter]
    fn jpeghash_digest(&self, py: Python<'_>) -> Py<PyBytes> {
        PyBytes::new(py, self.artifact.source_digest().as_bytes()).into()
    }

    /// Decode the stream and check it against `jpeghash`.
    #[pyo3(signature = (threads = 4))]
    fn restore(&self, py: Python<'_>, threads: i64) -> PyResult<Py<PyBytes>> {
        let transcoder = transcoder()?;
        let concurrency = concurrency(threads)?;
        let jpeg = py
            .allow_threads(|| self.artifact.restore(&transcoder, concurrency))
            .map_err(to_py_err)?;
        Ok(PyBytes::new(py, &jpeg).into())
    }

    fn __len__(&self) -> usize {
        self.artifact.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "VerifiedLep(len={}, jpeghash='{}')",
            self.artifact.len(),
            self.artifact.source_digest()
        )
    }
}

/// Encode JPEG bytes into a Lepton stream.
///
/// Args:
///     jpeg: JPEG file bytes
///     threads: thread-count hint for the engine
///
/// Returns:
///     Lepton bytes
#[pyfunction]
#[pyo3(signature = (jpeg, threads = 4))]
fn encode(py: Python<'_>, jpeg: &[u8], threads: i64) -> PyResult<Py<PyBytes>> {
    let transcoder = transcoder()?;
    let concurrency = concurrency(threads)?;
    let lep = py
        .allow_threads(|| transcoder.encode(jpeg, concurrency))
        .map_err(to_py_err)?;
    Ok(PyBytes::new(py, &lep).into())
}

/// Decode a Lepton stream back into JPEG bytes.
#[pyfunction]
#[pyo3(signature = (lep, threads = 4))]
fn decode(py: Python<'_>, lep: &[u8], threads: i64) -> PyResult<Py<PyBytes>> {
    let transcoder = transcoder()?;
    let concurrency = concurrency(threads)?;
    let jpeg = py
        .allow_threads(|| transcoder.decode(lep, concurrency))
        .map_err(to_py_err)?;
    Ok(PyBytes::new(py, &jpeg).into())
}

/// Encode a JPEG and verify the round trip before returning it.
#[pyfunction]
#[pyo3(signature = (jpeg, threads = 4))]
fn encode_verify(py: Python<'_>, jpeg: &[u8], threads: i64) -> PyResult<VerifiedLep> {
    let transcoder = transcoder()?;
    let concurrency = concurrency(threads)?;
    let artifact = py
        .allow_threads(|| transcoder.encode_and_verify(jpeg, concurrency))
        .map_err(to_py_err)?;
    Ok(VerifiedLep { artifact })
}

/// Hex digest of arbitrary bytes, as used for `VerifiedLep.jpeghash`.
#[pyfunction]
fn digest(data: &[u8]) -> String {
    Digest128::of(data).to_hex()
}

static INIT_LOGGER: Once = Once::new();

/// Route library logs to stderr. Only the first call has any effect.
#[pyfunction]
#[pyo3(signature = (verbose = false))]
fn enable_logging(verbose: bool) {
    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        });
        let _ = builder.try_init();
    });
}

// Internal helpers

fn transcoder() -> PyResult<Transcoder<'static>> {
    Transcoder::global().map_err(to_py_err)
}

fn concurrency(threads: i64) -> PyResult<Concurrency> {
    Concurrency::try_from(threads).map_err(to_py_err)
}

fn to_py_err(err: TranscodeError) -> PyErr {
    match err {
        TranscodeError::IntegrityMismatch { .. }
        | TranscodeError::InvalidConcurrency(_)
        | TranscodeError::InvalidDigest(_) => PyValueError::new_err(err.to_string()),
        TranscodeError::EngineFailure { .. } | TranscodeError::EngineUnavailable => {
            PyRuntimeError::new_err(err.to_string())
        }
    }
}

/// lepjpeg Python module.
#[pymodule]
fn lepjpeg(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_class::<VerifiedLep>()?;
    m.add_function(wrap_pyfunction!(encode, m)?)?;
    m.add_function(wrap_pyfunction!(decode, m)?)?;
    m.add_function(wrap_pyfunction!(encode_verify, m)?)?;
    m.add_function(wrap_pyfunction!(digest, m)?)?;
    m.add_function(wrap_pyfunction!(enable_logging, m)?)?;
    Ok(())
}
