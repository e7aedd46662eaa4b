use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::sleep;
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use crate::config::ScannerConfig;
use crate::decoder::{Barcode, BarcodeDecoder, CANCEL_POLL_INTERVAL};
use crate::device::{DeviceBackend, InputDevice};
use crate::error::{ScannerError, ScannerResult};
use crate::handle::ScannerHandle;
use crate::resolver::resolve;

/// Keeps a scanner resolved and forwards every barcode it reads.
///
/// Retries resolution while the scanner is missing and re-resolves after a
/// read failure. Stops when `running` is cleared.
#[derive(Debug)]
pub struct BarcodeServer<B: DeviceBackend> {
    backend: B,
    config: ScannerConfig,
    retry_interval: Duration,
}

/// What to do after the current handle stopped producing barcodes.
enum Next {
    Reresolve,
    Stop,
}

impl<B: DeviceBackend> BarcodeServer<B> {
    #[tracing::instrument(skip(backend))]
    pub fn new(backend: B, config: ScannerConfig, retry_interval: Duration) -> Self {
        info!(
            "Creating barcode server for device: {}",
            config.identity()
        );

        BarcodeServer {
            backend,
            config,
            retry_interval,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Serve until `running` becomes `false`. Every barcode goes to `on_barcode`.
    #[tracing::instrument(skip(self, running, on_barcode))]
    pub fn run<F>(&self, running: &AtomicBool, mut on_barcode: F) -> ScannerResult<()>
    where
        F: FnMut(Barcode),
    {
        info!("Starting server.");

        let cancel = || !running.load(Ordering::SeqCst);
        let decoder = BarcodeDecoder::from_config(&self.config);

        while !cancel() {
            let mut handle = match resolve(&self.backend, self.config.identity()) {
                Ok(handle) => handle,
                Err(e @ ScannerError::DeviceNotFound { .. })
                | Err(e @ ScannerError::ListingFailed { .. }) => {
                    info!("{}. Retrying in {:?}.", e, self.retry_interval);
                    self.wait(&cancel);
                    continue;
                }
                Err(e) => return Err(e),
            };

            info!("Entering read loop.");
            let next = serve(&decoder, &mut handle, &cancel, &mut on_barcode);
            handle.close();

            match next {
                Next::Stop => break,
                Next::Reresolve => {
                    info!("Retrying in {:?}.", self.retry_interval);
                    self.wait(&cancel);
                }
            }
        }

        info!("Server stopped.");
        Ok(())
    }

    /// Sleep for the retry interval, waking early on cancel.
    ///
    /// An interval too long to represent as a deadline waits until cancelled.
    fn wait(&self, cancel: &dyn Fn() -> bool) {
        let deadline = Instant::now().checked_add(self.retry_interval);
        while !cancel() {
            let step = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    CANCEL_POLL_INTERVAL.min(deadline - now)
                }
                None => CANCEL_POLL_INTERVAL,
            };
            sleep(step);
        }
    }
}

/// Read barcodes from `handle` until it fails or `cancel` fires.
fn serve<D, F>(
    decoder: &BarcodeDecoder,
    handle: &mut ScannerHandle<D>,
    cancel: &dyn Fn() -> bool,
    on_barcode: &mut F,
) -> Next
where
    D: InputDevice,
    F: FnMut(Barcode),
{
    loop {
        match decoder.read_barcode(handle, Some(cancel)) {
            Ok(Some(barcode)) => on_barcode(barcode),
            Ok(None) => return Next::Stop,
            Err(ScannerError::BufferOverflow { capacity }) => {
                warn!(
                    "Scan longer than {} characters, skipping to its end.",
                    capacity
                );
                match decoder.discard_until_terminator(handle, Some(cancel)) {
                    Ok(true) => {}
                    Ok(false) => return Next::Stop,
                    Err(e) => {
                        error!("{}", e);
                        return Next::Reresolve;
                    }
                }
            }
            Err(e) => {
                error!("{}", e);
                return Next::Reresolve;
            }
        }
    }
}
