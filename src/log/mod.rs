//! Logging functionality and error reporting.
//! The logging library of choice is [tracing].

mod badge;
mod report;

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

use crate::Config;
pub use badge::BadgeFormat;
pub use badge::Badges;
pub use badge::TimeZone;
pub use report::handle_framework_error;

/// The name of this crate, used to set filter target.
const THIS_CRATE: &str = env!("CARGO_CRATE_NAME");

/// Setup format layers, tracing subscribers, and installs tracing.
/// The console gets badge lines, log files get compact lines.
pub(super) fn install_tracing(config: &Config) -> Option<WorkerGuard> {
    let logging = config.logging();

    // Set which traces are tracked.
    // By default, all INFO traces and above are shown.
    let target = if logging.console_debug {
        Targets::new()
            .with_default(LevelFilter::INFO)
            .with_target(THIS_CRATE, LevelFilter::DEBUG)
    } else {
        Targets::new().with_default(LevelFilter::INFO)
    };

    let console_format = BadgeFormat::new(
        logging.badges.clone(),
        logging.show_timestamp,
        logging.time_zone,
    );
    let console_layer = fmt::layer()
        .with_ansi(true)
        .event_format(console_format)
        .with_filter(target.clone());

    // Compose the layer that writes logs and get a guard for the writer.
    let (log_layer, guard) = if logging.logs_enabled {
        // Put file logs in `log_dir` directory as "{THIS_CRATE}.log.{TIMESTAMP}" on an hourly basis.
        let prefix_format = format!("{THIS_CRATE}.log");
        let appender = tracing_appender::rolling::hourly(&logging.log_dir, prefix_format);

        // Create the writer and writer guard.
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let layer = fmt::layer()
            .with_ansi(false)
            .with_file(logging.console_debug)
            .with_level(true)
            .with_line_number(logging.console_debug)
            .with_target(true)
            .with_timer(fmt::time::ChronoLocal::rfc_3339())
            .with_writer(writer)
            .compact()
            .with_filter(target);

        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    // Add all the layers and initialize them.
    tracing_subscriber::registry()
        .with(console_layer)
        .with(log_layer)
        .init();

    guard
}
