//! Error types for device resolution and barcode decoding.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::devices::HardwareIdentity;

/// Errors reported by the resolver, the scanner handle and the decoder.
#[derive(Error, Debug)]
pub enum ScannerError {
    /// No candidate device reported the wanted identity.
    #[error("no input device matches {identity}")]
    DeviceNotFound { identity: HardwareIdentity },

    /// The input directory could not be listed.
    #[error("failed to list input devices in {}: {source}", dir.display())]
    ListingFailed {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A candidate could not be opened. Skipped during resolution.
    #[error("failed to open {}: {source}", path.display())]
    DeviceOpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A candidate's identity could not be queried. Skipped during resolution.
    #[error("failed to query identity of {}: {source}", path.display())]
    IdentityQueryFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// More data characters arrived than a barcode may hold.
    #[error("barcode exceeds {capacity} characters")]
    BufferOverflow { capacity: usize },

    /// Reading from the device failed. The handle is unusable afterwards.
    #[error("failed to read from scanner: {0}")]
    ReadFailed(#[source] io::Error),

    /// The handle already failed a read and must be closed.
    #[error("scanner handle failed earlier and must be re-resolved")]
    HandleFailed,
}

pub type ScannerResult<T> = Result<T, ScannerError>;
