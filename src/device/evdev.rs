use std::collections::VecDeque;
use std::fmt::{Debug, Error, Formatter};
use std::fs;
use std::io;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::trace;

use super::{DeviceBackend, InputDevice};
use crate::constants::INPUT_DIR;
use crate::devices::HardwareIdentity;
use crate::event::RawInputEvent;

/// Backend over the kernel's evdev character devices.
#[derive(Debug, Clone)]
pub struct EvdevBackend {
    input_dir: PathBuf,
}

impl EvdevBackend {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        EvdevBackend {
            input_dir: input_dir.into(),
        }
    }
}

impl Default for EvdevBackend {
    fn default() -> Self {
        EvdevBackend::new(INPUT_DIR)
    }
}

impl DeviceBackend for EvdevBackend {
    type Device = EvdevDevice;

    fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    fn list_entries(&self) -> io::Result<Vec<String>> {
        let mut names = vec![];
        for entry in fs::read_dir(&self.input_dir)? {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    /// Opens the node through `evdev::Device::open`, which asks for read-write
    /// access and falls back to read-only. Only reads are ever issued; write
    /// access merely lets the kernel accept LED updates nobody sends.
    fn open(&self, path: &Path) -> io::Result<EvdevDevice> {
        let device = ::evdev::Device::open(path)?;
        Ok(EvdevDevice {
            device,
            pending: VecDeque::new(),
        })
    }
}

/// An opened evdev node.
///
/// The kernel hands out events in batches; events of a batch that have not
/// been consumed yet wait in `pending`.
pub struct EvdevDevice {
    device: ::evdev::Device,
    pending: VecDeque<RawInputEvent>,
}

impl Debug for EvdevDevice {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(
            f,
            "EvdevDevice {{ name: {:?}, pending: {} }}",
            self.device.name(),
            self.pending.len()
        )
    }
}

impl EvdevDevice {
    /// Wait until the device is readable. Returns `false` on timeout.
    fn wait_readable(&self, timeout: Duration) -> io::Result<bool> {
        let mut pollfd = libc::pollfd {
            fd: self.device.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let millis = libc::c_int::try_from(timeout.as_millis()).unwrap_or(libc::c_int::MAX);

        // SAFETY: `pollfd` is a single valid entry and the fd stays open for
        // the duration of the call.
        let ready = unsafe { libc::poll(&mut pollfd, 1, millis) };

        match ready {
            -1 => {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    Ok(false)
                } else {
                    Err(err)
                }
            }
            0 => Ok(false),
            _ => Ok(true),
        }
    }
}

impl InputDevice for EvdevDevice {
    /// Never fails: `evdev` queries the ID (`EVIOCGID`) while opening, so a
    /// node whose ID cannot be read is already rejected as an open failure.
    fn identity(&self) -> io::Result<HardwareIdentity> {
        let id = self.device.input_id();
        Ok(HardwareIdentity::new(id.vendor(), id.product()))
    }

    fn grab(&mut self) -> io::Result<()> {
        self.device.grab()
    }

    fn ungrab(&mut self) -> io::Result<()> {
        self.device.ungrab()
    }

    fn next_event(&mut self, timeout: Option<Duration>) -> io::Result<Option<RawInputEvent>> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(Some(event));
            }

            if let Some(timeout) = timeout {
                if !self.wait_readable(timeout)? {
                    return Ok(None);
                }
            }

            let events = self.device.fetch_events()?;
            self.pending.extend(events.map(RawInputEvent::from));
            trace!("Fetched {} events.", self.pending.len());
        }
    }
}
