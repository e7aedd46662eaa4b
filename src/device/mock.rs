//! Simulated input devices for tests.
//!
//! A [`MockBackend`] holds a fixed directory listing and a map from entry name
//! to [`MockDeviceSpec`]. Every open hands out a fresh [`MockDevice`] replaying
//! the spec's script. The backend counts live devices so tests can check that
//! rejected candidates were closed.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{DeviceBackend, InputDevice};
use crate::constants::INPUT_DIR;
use crate::devices::HardwareIdentity;
use crate::event::RawInputEvent;

/// One scripted outcome of [`InputDevice::next_event`].
#[derive(Debug, Clone)]
pub enum MockRead {
    /// An event is delivered.
    Event(RawInputEvent),
    /// Nothing arrives within the timeout. Blocking reads skip over it.
    Idle,
    /// The read fails.
    Fail(io::ErrorKind),
}

/// Behaviour of one simulated node.
#[derive(Debug, Clone)]
pub struct MockDeviceSpec {
    identity: Option<HardwareIdentity>,
    open_fails: bool,
    grab_fails: bool,
    script: Vec<MockRead>,
}

impl MockDeviceSpec {
    /// A node that opens fine and reports `identity`.
    pub fn new(identity: HardwareIdentity) -> Self {
        MockDeviceSpec {
            identity: Some(identity),
            open_fails: false,
            grab_fails: false,
            script: vec![],
        }
    }

    /// A node that cannot be opened.
    pub fn unopenable() -> Self {
        MockDeviceSpec {
            open_fails: true,
            ..MockDeviceSpec::new(HardwareIdentity::default())
        }
    }

    /// A node that opens but fails the identity query.
    pub fn unidentifiable() -> Self {
        MockDeviceSpec {
            identity: None,
            ..MockDeviceSpec::new(HardwareIdentity::default())
        }
    }

    /// Refuse exclusive access.
    pub fn with_grab_failure(mut self) -> Self {
        self.grab_fails = true;
        self
    }

    /// Append events to the read script.
    pub fn with_events<I>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = RawInputEvent>,
    {
        self.script.extend(events.into_iter().map(MockRead::Event));
        self
    }

    /// Append key presses for `codes` to the read script.
    pub fn with_key_presses<I>(self, codes: I) -> Self
    where
        I: IntoIterator<Item = u16>,
    {
        self.with_events(codes.into_iter().map(RawInputEvent::key_press))
    }

    /// Append a read that times out.
    pub fn with_idle(mut self) -> Self {
        self.script.push(MockRead::Idle);
        self
    }

    /// Append a failing read.
    pub fn with_read_error(mut self, kind: io::ErrorKind) -> Self {
        self.script.push(MockRead::Fail(kind));
        self
    }
}

/// A scripted stand-in for an input directory.
#[derive(Debug)]
pub struct MockBackend {
    input_dir: PathBuf,
    entries: Vec<String>,
    specs: HashMap<String, MockDeviceSpec>,
    listing_fails: bool,
    live: Arc<AtomicUsize>,
    opened: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        MockBackend {
            input_dir: PathBuf::from(INPUT_DIR),
            entries: vec![],
            specs: HashMap::new(),
            listing_fails: false,
            live: Arc::new(AtomicUsize::new(0)),
            opened: Mutex::new(vec![]),
        }
    }

    /// Add a directory entry that is not backed by a device (symlinks, `by-id`, ...).
    pub fn with_entry(mut self, name: &str) -> Self {
        self.entries.push(name.to_string());
        self
    }

    /// Add a directory entry backed by a simulated device.
    pub fn with_device(mut self, name: &str, spec: MockDeviceSpec) -> Self {
        self.entries.push(name.to_string());
        self.specs.insert(name.to_string(), spec);
        self
    }

    /// Make listing the directory fail.
    pub fn with_listing_failure(mut self) -> Self {
        self.listing_fails = true;
        self
    }

    /// Number of devices opened and not yet dropped.
    pub fn live_handles(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Entry names passed to [`DeviceBackend::open`], in call order.
    pub fn open_attempts(&self) -> Vec<String> {
        self.open_log().clone()
    }

    fn open_log(&self) -> MutexGuard<'_, Vec<String>> {
        // A test that panicked mid-push leaves a usable log behind.
        self.opened.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        MockBackend::new()
    }
}

impl DeviceBackend for MockBackend {
    type Device = MockDevice;

    fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    fn list_entries(&self) -> io::Result<Vec<String>> {
        if self.listing_fails {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "listing refused"));
        }
        Ok(self.entries.clone())
    }

    fn open(&self, path: &Path) -> io::Result<MockDevice> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.open_log().push(name.clone());

        let spec = match self.specs.get(&name) {
            Some(spec) => spec,
            None => return Err(io::Error::new(io::ErrorKind::NotFound, "no such device")),
        };
        if spec.open_fails {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"));
        }

        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(MockDevice {
            identity: spec.identity,
            grab_fails: spec.grab_fails,
            grabbed: false,
            script: spec.script.iter().cloned().collect(),
            live: Arc::clone(&self.live),
        })
    }
}

/// An opened simulated node.
///
/// Once the script runs out, timed reads keep timing out and blocking reads
/// fail with `UnexpectedEof` so a test never hangs.
#[derive(Debug)]
pub struct MockDevice {
    identity: Option<HardwareIdentity>,
    grab_fails: bool,
    grabbed: bool,
    script: VecDeque<MockRead>,
    live: Arc<AtomicUsize>,
}

impl MockDevice {
    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }
}

impl InputDevice for MockDevice {
    fn identity(&self) -> io::Result<HardwareIdentity> {
        self.identity
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "EVIOCGID refused"))
    }

    fn grab(&mut self) -> io::Result<()> {
        if self.grab_fails {
            return Err(io::Error::from_raw_os_error(libc::EBUSY));
        }
        self.grabbed = true;
        Ok(())
    }

    fn ungrab(&mut self) -> io::Result<()> {
        self.grabbed = false;
        Ok(())
    }

    fn next_event(&mut self, timeout: Option<Duration>) -> io::Result<Option<RawInputEvent>> {
        loop {
            match self.script.pop_front() {
                Some(MockRead::Event(event)) => return Ok(Some(event)),
                Some(MockRead::Idle) if timeout.is_some() => return Ok(None),
                Some(MockRead::Idle) => continue,
                Some(MockRead::Fail(kind)) => return Err(io::Error::new(kind, "read failed")),
                None if timeout.is_some() => return Ok(None),
                None => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "script exhausted",
                    ))
                }
            }
        }
    }
}

impl Drop for MockDevice {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}
