//! Reads barcodes from a USB HID barcode scanner on Linux.
//!
//! The scanner presents itself as a keyboard. [`resolver::resolve`] finds it
//! among the evdev nodes by vendor and product ID and grabs it so its key
//! presses do not reach the focused application. [`decoder::BarcodeDecoder`]
//! then turns the stream of key presses into barcodes, one per press of the
//! terminator key.
//!
//! ```no_run
//! use scanner_evdev::decoder::BarcodeDecoder;
//! use scanner_evdev::device::evdev::EvdevBackend;
//! use scanner_evdev::devices::HardwareIdentity;
//! use scanner_evdev::resolver::resolve;
//!
//! # fn main() -> Result<(), scanner_evdev::error::ScannerError> {
//! let mut handle = resolve(&EvdevBackend::default(), HardwareIdentity::default())?;
//! let decoder = BarcodeDecoder::default();
//! while let Some(barcode) = decoder.read_barcode(&mut handle, None)? {
//!     println!("{}", barcode);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod device;
pub mod devices;
pub mod error;
pub mod event;
pub mod handle;
pub mod keycodes;
pub mod resolver;
pub mod server;
pub mod tools;
