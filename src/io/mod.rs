//! File formats: STL export, JSON presets and JSON reports.

#[cfg(feature = "stl-io")]
mod stl;

#[cfg(feature = "stl-io")]
pub use stl::{to_stl_ascii, to_stl_binary};

use crate::hull::params::Preset;
use serde::Serialize;
use std::path::Path;

/// Generic I/O and format‑conversion errors.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("std::io::Error: {0}")]
    StdIo(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Feature is not implemented: {0}")]
    Unimplemented(String),
}

/// Read a JSON preset file.
pub fn read_preset(path: &Path) -> Result<Preset, IoError> {
    let text = std::fs::read_to_string(path)?;
    Ok(Preset::from_json(&text)?)
}

/// Write any serializable value as pretty JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), IoError> {
    let text = serde_json::to_string_pretty(value)?;
    std::fs::write(path, text)?;
    Ok(())
}

/// Write a triangulated shape as STL, binary unless `ascii` is set.
pub fn write_stl<T: crate::triangulated::Triangulated3D>(
    path: &Path,
    shape: &T,
    name: &str,
    ascii: bool,
) -> Result<(), IoError> {
    #[cfg(feature = "stl-io")]
    {
        if ascii {
            std::fs::write(path, to_stl_ascii(shape, name))?;
        } else {
            std::fs::write(path, to_stl_binary(shape)?)?;
        }
        Ok(())
    }
    #[cfg(not(feature = "stl-io"))]
    {
        let _ = (path, shape, name, ascii);
        Err(IoError::Unimplemented("STL export requires the `stl-io` feature".into()))
    }
}
