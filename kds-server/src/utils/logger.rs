//! Tracing setup for the kitchen server
//!
//! Console output by default; when the work directory exists, a daily
//! rolling file appender writes there instead.

use std::path::Path;

/// Install the global tracing subscriber
///
/// An unparseable `level` falls back to `info`.
pub fn init(level: &str, log_dir: &str) {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level.parse().unwrap_or(tracing::Level::INFO))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if Path::new(log_dir).is_dir() {
        let appender = tracing_appender::rolling::daily(log_dir, "kds-server");
        subscriber.with_writer(appender).init();
    } else {
        subscriber.init();
    }
}
