use time::macros::format_description;
use tokio::sync::OnceCell;
use tracing::metadata::LevelFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LEVEL: LevelFilter = LevelFilter::INFO;
static TRACING_INITIALIZED: OnceCell<()> = OnceCell::const_new();

/// Installs the global subscriber. The level defaults to info and is overridden by `RUST_LOG`.
/// Calling it again has no effect.
pub async fn configure_tracing() {
    TRACING_INITIALIZED
        .get_or_init(|| async {
            let time_format = format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
            );

            let fmt_layer = fmt::layer()
                .compact()
                .with_timer(UtcTime::new(time_format))
                .with_target(false)
                .with_file(true)
                .with_line_number(true);
            let level_filter_layer =
                EnvFilter::builder().with_default_directive(DEFAULT_LEVEL.into()).from_env_lossy();

            tracing_subscriber::registry().with(fmt_layer).with(level_filter_layer).init();
            tracing::debug!("Tracing has been initialized.");
        })
        .await;
}
