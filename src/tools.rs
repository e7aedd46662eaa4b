use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Installs the process-wide `tracing` subscriber.
///
/// Filtering follows `RUST_LOG`. When it is unset, `info` applies everywhere and `debug` to
/// this crate. `json_output` switches from the human-readable format to one JSON object per line.
///
/// # Panics
///
/// Panics when called twice, since a global subscriber can only be set once.
pub fn initialize_logging(json_output: bool) {
    // set default logging levels:
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info,scanner_evdev=debug");
    }
    let subscriber = FmtSubscriber::builder().with_env_filter(EnvFilter::from_default_env());
    if json_output {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
