//! Observability utilities.

mod logging;
mod timer;

pub use logging::{init_logging, BracketedFormat, LogConfig, LogFormat, LOG_ENV_VAR};
pub use timer::SpanTimer;
