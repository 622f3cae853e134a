use std::backtrace::Backtrace;
use std::panic::PanicHookInfo;

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Installs the global subscriber. An explicit `RUST_LOG` in the environment
/// wins over the configured `APP_LOGGING__RUST_LOG` filter.
pub fn init_tracing(cfg: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.rust_log));
    fmt().with_env_filter(filter).with_target(false).init();

    // panics in request handlers must end up in the log stream, not stderr
    std::panic::set_hook(Box::new(report_panic));
}

fn report_panic(info: &PanicHookInfo<'_>) {
    let message = payload_message(info);
    let backtrace = Backtrace::capture();
    match info.location() {
        Some(location) => tracing::error!(
            panic = %message,
            location = %location,
            backtrace = %backtrace,
            "panic"
        ),
        None => tracing::error!(panic = %message, backtrace = %backtrace, "panic"),
    }
}

fn payload_message<'a>(info: &'a PanicHookInfo<'_>) -> &'a str {
    if let Some(message) = info.payload().downcast_ref::<&str>() {
        message
    } else if let Some(message) = info.payload().downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
