//! Diagnostic logging setup.
//!
//! Engine and steps log through `tracing`. [`init_logging`] installs a
//! subscriber whose text lines look like `[INFO] pipeline: message`.

use crate::errors::PublishError;
use serde::{Deserialize, Serialize};
use std::env::VarError;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the configured log filter.
pub const LOG_ENV_VAR: &str = "PUBLISHFLOW_LOG";

/// Output format of the log sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `[LEVEL] logger: message` lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive, e.g. `info` or `publishflow=debug`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Logger name printed on every text line.
    #[serde(default = "default_logger")]
    pub logger: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_logger() -> String {
    "pipeline".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            logger: default_logger(),
            format: LogFormat::default(),
        }
    }
}

impl LogConfig {
    /// Sets the filter directive.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Sets the logger name.
    #[must_use]
    pub fn with_logger(mut self, logger: impl Into<String>) -> Self {
        self.logger = logger.into();
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

/// Event formatter producing `[LEVEL] logger: message`.
#[derive(Debug, Clone)]
pub struct BracketedFormat {
    logger: String,
}

impl BracketedFormat {
    /// Creates a formatter printing the given logger name.
    #[must_use]
    pub fn new(logger: impl Into<String>) -> Self {
        Self {
            logger: logger.into(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for BracketedFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        write!(&mut writer, "[{}] {}: ", event.metadata().level(), self.logger)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Builds the log filter from the value of `PUBLISHFLOW_LOG`, falling back to
/// `config.level` only when the variable is unset.
fn resolve_filter(
    config: &LogConfig,
    env_value: Result<String, VarError>,
) -> Result<EnvFilter, PublishError> {
    match env_value {
        Ok(directives) => EnvFilter::try_new(&directives).map_err(|e| {
            PublishError::Config(format!("invalid {LOG_ENV_VAR} value '{directives}': {e}"))
        }),
        Err(VarError::NotPresent) => EnvFilter::try_new(&config.level).map_err(|e| {
            PublishError::Config(format!("invalid log level '{}': {e}", config.level))
        }),
        Err(e @ VarError::NotUnicode(_)) => {
            Err(PublishError::Config(format!("invalid {LOG_ENV_VAR} value: {e}")))
        }
    }
}

/// Installs the global log subscriber.
///
/// `PUBLISHFLOW_LOG` takes precedence over `config.level`.
///
/// # Errors
///
/// Returns `PublishError::Config` if the filter does not parse or a global
/// subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<(), PublishError> {
    let filter = resolve_filter(config, std::env::var(LOG_ENV_VAR))?;

    let installed = match config.format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .event_format(BracketedFormat::new(&config.logger))
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init(),
    };

    installed.map_err(|e| PublishError::Config(format!("cannot install log subscriber: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io::Write;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_bracketed_format() {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .event_format(BracketedFormat::new("pipeline"))
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("publishing started");
            tracing::warn!(definition = "helpers", "skipped");
        });

        let output = String::from_utf8(buf.0.lock().clone()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "[INFO] pipeline: publishing started");
        assert!(lines[1].starts_with("[WARN] pipeline: "));
        assert!(lines[1].contains("skipped"));
        assert!(lines[1].contains("definition=\"helpers\""));
    }

    #[test]
    fn test_env_filter_overrides_config_level() {
        let config = LogConfig::default().with_level("warn");

        let filter = resolve_filter(&config, Ok("publishflow=debug".to_string())).unwrap();
        assert!(filter.to_string().contains("publishflow=debug"));

        let filter = resolve_filter(&config, Err(VarError::NotPresent)).unwrap();
        assert!(filter.to_string().contains("warn"));
    }

    #[test]
    fn test_invalid_env_filter_is_an_error() {
        let config = LogConfig::default();
        let err = resolve_filter(&config, Ok("publishflow=loud".to_string())).unwrap_err();
        assert!(matches!(err, PublishError::Config(ref msg) if msg.contains(LOG_ENV_VAR)));

        let bad_level = LogConfig::default().with_level("publishflow=loud");
        assert!(resolve_filter(&bad_level, Err(VarError::NotPresent)).is_err());
    }

    #[test]
    fn test_init_logging_rejects_invalid_env_override() {
        // Only this test touches the variable.
        std::env::set_var(LOG_ENV_VAR, "publishflow=loud");
        let result = init_logging(&LogConfig::default());
        std::env::remove_var(LOG_ENV_VAR);

        let err = result.unwrap_err();
        assert!(err.to_string().contains(LOG_ENV_VAR));
    }

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::default()
            .with_level("debug")
            .with_logger("natron")
            .with_format(LogFormat::Json);

        assert_eq!(config.level, "debug");
        assert_eq!(config.logger, "natron");
        assert_eq!(config.format, LogFormat::Json);
    }
}
