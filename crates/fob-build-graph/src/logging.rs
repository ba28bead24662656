//! Logging setup for binaries and tests that embed the build graph.
//!
//! This module is only available with the `logging` feature.
//!
//! The graph itself only emits `tracing` events (buffer growth, rehashes,
//! snapshot sizes, cycles). Libraries should leave subscriber installation to
//! the application; these helpers are for applications that just want output.

use std::sync::Once;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable read before `RUST_LOG`.
pub const LOG_ENV_VAR: &str = "FOB_GRAPH_LOG";

static INIT: Once = Once::new();

/// Verbosity of graph log output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Silent,
    Error,
    /// Cycles found by topological sort and aborted mutation batches.
    #[default]
    Warn,
    Info,
    /// Buffer growth, compaction, rehash and snapshot events.
    Debug,
    /// Also reports where traversals were stopped.
    Trace,
}

impl LogLevel {
    fn as_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Silent => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "off" => Ok(LogLevel::Silent),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("Invalid log level: {other}")),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogLevel::Silent => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        f.write_str(name)
    }
}

fn install(filter: EnvFilter) {
    // `try_init` so a subscriber installed elsewhere is left in place.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false).without_time())
        .try_init();
}

/// Install a global subscriber at `level`. `RUST_LOG` directives still apply
/// on top of it.
///
/// Only the first call in a process has any effect.
///
/// # Example
///
/// ```rust,no_run
/// use fob_build_graph::logging::{LogLevel, init_logging};
///
/// init_logging(LogLevel::Debug);
/// ```
pub fn init_logging(level: LogLevel) {
    INIT.call_once(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(level.as_level_filter().into())
            .from_env_lossy();
        install(filter);
    });
}

/// Install a global subscriber configured from `FOB_GRAPH_LOG`, then
/// `RUST_LOG`, falling back to [`LogLevel::default`].
pub fn init_logging_from_env() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| {
                EnvFilter::builder()
                    .with_default_directive(LogLevel::default().as_level_filter().into())
                    .parse_lossy("")
            });
        install(filter);
    });
}
