//! Capabilities the resolver and decoder need from the input layer.
//!
//! [`DeviceBackend`] lists and opens candidate nodes, [`InputDevice`] is one
//! opened node. Dropping an [`InputDevice`] closes it.
//!
//! The production backend talks to evdev nodes through the `evdev` crate;
//! tests use [`mock::MockBackend`].

use std::io;
use std::path::Path;
use std::time::Duration;

use crate::devices::HardwareIdentity;
use crate::event::RawInputEvent;

pub mod evdev;
pub mod mock;

/// An opened input device.
pub trait InputDevice {
    /// Query the vendor/product pair of the device.
    fn identity(&self) -> io::Result<HardwareIdentity>;

    /// Route the device's events exclusively to this process.
    fn grab(&mut self) -> io::Result<()>;

    /// Give up exclusive access obtained by [`InputDevice::grab`].
    fn ungrab(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Read the next raw event.
    ///
    /// With `timeout = None` this blocks until an event arrives. Otherwise it
    /// returns `Ok(None)` if nothing arrived within `timeout`.
    fn next_event(&mut self, timeout: Option<Duration>) -> io::Result<Option<RawInputEvent>>;
}

/// Source of candidate devices.
pub trait DeviceBackend {
    type Device: InputDevice;

    /// Directory the candidates live in.
    fn input_dir(&self) -> &Path;

    /// Names of all entries in [`DeviceBackend::input_dir`], in no particular order.
    fn list_entries(&self) -> io::Result<Vec<String>>;

    /// Open the node at `path` for reading.
    fn open(&self, path: &Path) -> io::Result<Self::Device>;
}
