use std::path::PathBuf;

use crate::constants::{INPUT_DIR, MAX_BARCODE_LEN, SCANNER_PID, SCANNER_VID, TERMINATOR_CODE};
use crate::devices::HardwareIdentity;

/// Settings for locating the scanner and decoding its key presses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Selects the target device.
    pub vendor_id: u16,
    /// Selects the target device.
    pub product_id: u16,
    /// Scancode marking the end of a barcode.
    pub terminator_code: u16,
    /// Longest accepted barcode; one more character is an overflow.
    pub max_length: usize,
    /// Directory searched for `event*` nodes.
    pub input_dir: PathBuf,
}

impl ScannerConfig {
    pub fn identity(&self) -> HardwareIdentity {
        HardwareIdentity::new(self.vendor_id, self.product_id)
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            vendor_id: SCANNER_VID,
            product_id: SCANNER_PID,
            terminator_code: TERMINATOR_CODE,
            max_length: MAX_BARCODE_LEN,
            input_dir: PathBuf::from(INPUT_DIR),
        }
    }
}
