// Barcode scanners in keyboard emulation mode type every barcode as a burst of
// key presses followed by Enter. Left alone, those key presses land in
// whatever window has focus. This server takes the scanner away from the
// desktop by grabbing its evdev node and prints each barcode on its own line.
//
// The scanner is recognized by its USB vendor and product ID; all `event*`
// nodes under /dev/input are probed until one reports them. Reading those
// nodes usually needs root or membership in the `input` group.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use scanner_evdev::cli::Cli;
use scanner_evdev::device::evdev::EvdevBackend;
use scanner_evdev::error::ScannerResult;
use scanner_evdev::server::BarcodeServer;
use scanner_evdev::tools;

fn main() -> ScannerResult<()> {
    let cli = Cli::parse();
    tools::initialize_logging(cli.json_logs);
    info!("Starting scanner_evdev.");

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    if let Err(e) = ctrlc::set_handler(move || r.store(false, Ordering::SeqCst)) {
        warn!("Failed to install Ctrl-C handler: {}", e);
    }

    let config = cli.config();
    let backend = EvdevBackend::new(config.input_dir.clone());
    let server = BarcodeServer::new(backend, config, cli.retry_interval());

    server.run(&running, |barcode| println!("{}", barcode))
}
