use std::fmt::{Debug, Error, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::device::InputDevice;
use crate::devices::HardwareIdentity;
use crate::error::{ScannerError, ScannerResult};
use crate::event::RawInputEvent;

/// Lifecycle of a [`ScannerHandle`].
///
/// A closed handle does not exist: [`ScannerHandle::close`] consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    /// Open and readable. `grabbed` tells whether exclusive access was granted.
    Open { grabbed: bool },
    /// A read failed. The handle has to be closed and the device re-resolved.
    Failed,
}

/// Exclusive access to the resolved scanner.
///
/// Reads take `&mut self`, so only one caller can drive the device at a time.
pub struct ScannerHandle<D: InputDevice> {
    device: D,
    path: PathBuf,
    identity: HardwareIdentity,
    state: HandleState,
}

impl<D: InputDevice> Debug for ScannerHandle<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(
            f,
            "ScannerHandle {{ path: {}, identity: {}, state: {:?} }}",
            self.path.display(),
            self.identity,
            self.state
        )
    }
}

impl<D: InputDevice> ScannerHandle<D> {
    pub(crate) fn new(device: D, path: PathBuf, identity: HardwareIdentity) -> Self {
        ScannerHandle {
            device,
            path,
            identity,
            state: HandleState::Open { grabbed: false },
        }
    }

    /// Request exclusive access. Failure is logged and otherwise tolerated.
    pub(crate) fn grab(&mut self) {
        match self.device.grab() {
            Ok(()) => {
                debug!("Grabbed {}.", self.path.display());
                self.state = HandleState::Open { grabbed: true };
            }
            Err(e) => {
                warn!(
                    "Failed to grab {}: {}. Its key presses will also reach other listeners.",
                    self.path.display(),
                    e
                );
            }
        }
    }

    /// Path of the device node.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn identity(&self) -> HardwareIdentity {
        self.identity
    }

    pub fn state(&self) -> HandleState {
        self.state
    }

    /// `true` if the device's events are routed only to this process.
    pub fn is_grabbed(&self) -> bool {
        self.state == HandleState::Open { grabbed: true }
    }

    /// Access to the underlying device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Read the next raw event, see [`InputDevice::next_event`].
    ///
    /// A read error moves the handle to [`HandleState::Failed`]; every later
    /// call returns [`ScannerError::HandleFailed`].
    pub fn next_event(
        &mut self,
        timeout: Option<Duration>,
    ) -> ScannerResult<Option<RawInputEvent>> {
        if self.state == HandleState::Failed {
            return Err(ScannerError::HandleFailed);
        }
        self.device.next_event(timeout).map_err(|e| {
            self.state = HandleState::Failed;
            ScannerError::ReadFailed(e)
        })
    }

    /// Release the grab and close the device.
    pub fn close(mut self) {
        if self.is_grabbed() {
            if let Err(e) = self.device.ungrab() {
                debug!("Failed to release grab on {}: {}", self.path.display(), e);
            }
        }
        info!("Closed {}.", self.path.display());
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::device::mock::{MockBackend, MockDevice, MockDeviceSpec};
    use crate::device::DeviceBackend;

    fn open_handle(spec: MockDeviceSpec) -> (MockBackend, ScannerHandle<MockDevice>) {
        let backend = MockBackend::new().with_device("event0", spec);
        let path = backend.input_dir().join("event0");
        let device = backend.open(&path).expect("open should succeed");
        (backend, ScannerHandle::new(device, path, HardwareIdentity::default()))
    }

    #[test]
    fn test_grab_sets_state() {
        let (_backend, mut handle) = open_handle(MockDeviceSpec::new(HardwareIdentity::default()));

        assert_eq!(handle.state(), HandleState::Open { grabbed: false });
        handle.grab();

        assert!(handle.is_grabbed());
        assert!(handle.device().is_grabbed());
    }

    #[test]
    fn test_failed_grab_keeps_handle_usable() {
        let (_backend, mut handle) = open_handle(
            MockDeviceSpec::new(HardwareIdentity::default())
                .with_grab_failure()
                .with_key_presses([30]),
        );

        handle.grab();

        assert_eq!(handle.state(), HandleState::Open { grabbed: false });
        let event = handle.next_event(None).expect("read should succeed");
        assert_eq!(event, Some(RawInputEvent::key_press(30)));
    }

    #[test]
    fn test_read_error_fails_handle() {
        let (_backend, mut handle) = open_handle(
            MockDeviceSpec::new(HardwareIdentity::default())
                .with_read_error(io::ErrorKind::BrokenPipe)
                .with_key_presses([30]),
        );

        let err = handle.next_event(None).expect_err("read should fail");
        assert!(matches!(
            err,
            ScannerError::ReadFailed(ref e) if e.kind() == io::ErrorKind::BrokenPipe
        ));
        assert_eq!(handle.state(), HandleState::Failed);

        // The scripted press after the error is never delivered.
        let err = handle.next_event(None).expect_err("failed handle must not be reused");
        assert!(matches!(err, ScannerError::HandleFailed));
    }

    #[test]
    fn test_close_releases_device() {
        let (backend, mut handle) = open_handle(MockDeviceSpec::new(HardwareIdentity::default()));
        handle.grab();
        assert_eq!(backend.live_handles(), 1);

        handle.close();

        assert_eq!(backend.live_handles(), 0);
    }
}
