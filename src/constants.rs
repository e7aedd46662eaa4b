/// Vendor ID of the supported barcode scanner.
pub const SCANNER_VID: u16 = 0x0581;

/// Product ID of the supported barcode scanner.
pub const SCANNER_PID: u16 = 0x0103;

/// Scancode the scanner sends after the last character of a barcode (`KEY_ENTER`).
pub const TERMINATOR_CODE: u16 = 28;

/// Maximum number of data characters in a single barcode.
pub const MAX_BARCODE_LEN: usize = 14;

/// Upper bound accepted for a configured barcode length.
pub const MAX_CONFIGURABLE_LEN: usize = 4096;

/// Directory holding the evdev character devices.
pub const INPUT_DIR: &str = "/dev/input";

/// Only entries with this prefix are evdev event nodes.
pub const EVENT_NODE_PREFIX: &str = "event";
