use tracing::Level;
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Layer,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub format: LogFormat,
}

#[derive(Debug, Clone)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: Level::INFO,
            format: LogFormat::Compact,
        }
    }
}

/// Initialize the logging system. `RUST_LOG` overrides the configured level.
pub fn init_logging(config: LogConfig) {
    let env_filter = EnvFilter::from_default_env().add_directive(config.level.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer(&config.format))
        .init();
}

fn fmt_layer<S>(format: &LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    match format {
        LogFormat::Compact => fmt::layer().compact().without_time().boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Json => fmt::layer().json().boxed(),
    }
}

/// Compact logger for CLI runs.
pub fn init_cli_logger() {
    init_logging(LogConfig::default());
}
