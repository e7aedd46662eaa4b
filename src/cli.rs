//! Command-line interface.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::ScannerConfig;
use crate::constants::{INPUT_DIR, MAX_BARCODE_LEN, MAX_CONFIGURABLE_LEN, TERMINATOR_CODE};

/// Read barcodes from a USB HID barcode scanner and print them, one per line.
#[derive(Parser, Debug)]
#[command(name = "scanner_evdev", version)]
pub struct Cli {
    /// Vendor ID of the scanner (hex, `0x` prefix optional)
    #[arg(long, value_parser = parse_hex_u16, default_value = "0x0581")]
    pub vendor_id: u16,

    /// Product ID of the scanner (hex, `0x` prefix optional)
    #[arg(long, value_parser = parse_hex_u16, default_value = "0x0103")]
    pub product_id: u16,

    /// Scancode that ends a barcode
    #[arg(long, default_value_t = TERMINATOR_CODE)]
    pub terminator_code: u16,

    /// Longest accepted barcode
    #[arg(long, value_parser = parse_max_length, default_value_t = MAX_BARCODE_LEN)]
    pub max_length: usize,

    /// Directory searched for event nodes
    #[arg(long, default_value = INPUT_DIR)]
    pub input_dir: PathBuf,

    /// Seconds to wait before looking for the scanner again
    #[arg(long, default_value_t = 5)]
    pub retry_interval: u64,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    pub fn config(&self) -> ScannerConfig {
        ScannerConfig {
            vendor_id: self.vendor_id,
            product_id: self.product_id,
            terminator_code: self.terminator_code,
            max_length: self.max_length,
            input_dir: self.input_dir.clone(),
        }
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval)
    }
}

/// Parse a 16-bit ID written in hex, e.g. `0581` or `0x0581`.
pub fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid hex ID '{}': {}", s, e))
}

fn parse_max_length(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("max length must be at least 1".to_string()),
        Ok(n) if n > MAX_CONFIGURABLE_LEN => Err(format!(
            "max length must be at most {}",
            MAX_CONFIGURABLE_LEN
        )),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("invalid length '{}': {}", s, e)),
    }
}
