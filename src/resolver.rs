//! Locating the scanner among the input devices.

use std::path::Path;

use tracing::{debug, info, trace, warn};

use crate::constants::EVENT_NODE_PREFIX;
use crate::device::{DeviceBackend, InputDevice};
use crate::devices::HardwareIdentity;
use crate::error::{ScannerError, ScannerResult};
use crate::handle::ScannerHandle;

/// Order in which directory entries are tried.
///
/// Entries are sorted, reduced to the `event*` nodes and then walked from the
/// highest name down, so `["event3", "event1", "mouse0", "event0"]` yields
/// `["event3", "event1", "event0"]`. The order does not depend on how the
/// directory listing was ordered.
pub fn candidate_order<I, S>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut names: Vec<String> = entries.into_iter().map(Into::into).collect();
    names.sort();
    names.retain(|name| name.starts_with(EVENT_NODE_PREFIX));
    names.reverse();
    names
}

/// Find the input device reporting `wanted`, open it and grab it.
///
/// Candidates that cannot be opened or identified are logged and skipped.
/// Every rejected candidate is closed before the next one is tried, so on
/// return at most the matched device is open.
#[tracing::instrument(skip(backend))]
pub fn resolve<B: DeviceBackend>(
    backend: &B,
    wanted: HardwareIdentity,
) -> ScannerResult<ScannerHandle<B::Device>> {
    let dir = backend.input_dir();
    let entries = backend
        .list_entries()
        .map_err(|source| ScannerError::ListingFailed {
            dir: dir.to_path_buf(),
            source,
        })?;
    debug!("Found {} entries in {}.", entries.len(), dir.display());

    for name in candidate_order(entries) {
        let path = dir.join(&name);
        match probe(backend, &path, wanted) {
            Ok(Some(device)) => {
                info!("Scanner attached to {}.", path.display());
                let mut handle = ScannerHandle::new(device, path, wanted);
                handle.grab();
                return Ok(handle);
            }
            Ok(None) => {}
            Err(e) => warn!("Skipping candidate: {}", e),
        }
    }

    info!("Scanner not found or couldn't be opened.");
    Err(ScannerError::DeviceNotFound { identity: wanted })
}

/// Open one candidate and keep it only if it reports `wanted`.
fn probe<B: DeviceBackend>(
    backend: &B,
    path: &Path,
    wanted: HardwareIdentity,
) -> ScannerResult<Option<B::Device>> {
    trace!("Trying {}.", path.display());

    let device = backend
        .open(path)
        .map_err(|source| ScannerError::DeviceOpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
    let identity = device
        .identity()
        .map_err(|source| ScannerError::IdentityQueryFailed {
            path: path.to_path_buf(),
            source,
        })?;

    if identity == wanted {
        Ok(Some(device))
    } else {
        debug!("{} reports {}, not this one.", path.display(), identity);
        Ok(None)
    }
}
