use tracing_log::LogTracer;
use tracing_subscriber::{fmt, prelude::*, registry::Registry, EnvFilter};

pub const DEFAULT_FILTER: &str = "OFF,terminal_snake=INFO";

/// Installs the global subscriber. Logs go to stderr so they never mix with
/// the board printed on stdout. Calling it more than once is a no-op.
pub fn init(json: bool) {
    if LogTracer::init().is_err() {
        return;
    }

    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .unwrap_or_else(|_| EnvFilter::new("OFF"));
    let subscriber = Registry::default().with(filter_layer);

    let result = if json {
        let fmt_layer = fmt::layer().json().with_writer(std::io::stderr);
        tracing::subscriber::set_global_default(subscriber.with(fmt_layer))
    } else {
        let fmt_layer = fmt::layer().with_writer(std::io::stderr);
        tracing::subscriber::set_global_default(subscriber.with(fmt_layer))
    };

    if let Err(error) = result {
        eprintln!("Unable to install the log subscriber: {}", error);
    }
}
