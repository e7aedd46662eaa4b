use derive_more::Display;

use crate::constants::{SCANNER_PID, SCANNER_VID};

/// Hardware identity reported by an input device.
#[derive(Debug, Display, Eq, PartialEq, Clone, Copy)]
#[display(fmt = "VidPid {{ vid: {:#06x}, pid: {:#06x} }}", vid, pid)]
pub struct HardwareIdentity {
    /// Vendor ID.
    pub vid: u16,
    /// Product ID.
    pub pid: u16,
}

impl HardwareIdentity {
    pub const fn new(vid: u16, pid: u16) -> Self {
        HardwareIdentity { vid, pid }
    }
}

impl Default for HardwareIdentity {
    /// The identity of the supported scanner.
    fn default() -> Self {
        HardwareIdentity::new(SCANNER_VID, SCANNER_PID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_identity_is_supported_scanner() {
        let id = HardwareIdentity::default();
        assert_eq!(id.vid, 0x0581);
        assert_eq!(id.pid, 0x0103);
    }

    #[test]
    fn test_display_uses_padded_hex() {
        let id = HardwareIdentity::new(0x0581, 0x0103);
        assert_eq!(id.to_string(), "VidPid { vid: 0x0581, pid: 0x0103 }");
    }
}
