//! Session logger.
//!
//! Records from the session crates are printed at the requested level;
//! records from other crates (the detector stack in particular) are capped at
//! `warn` so per-frame detector chatter does not drown the session events.
//! Output goes to stderr as `[elapsed LEVEL module] message`.

use std::io::Write;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable read by [`init_from_env`].
pub const LOG_ENV_VAR: &str = "CALIB_SESSION_LOG";

const OWN_TARGETS: [&str; 2] = ["calib_session_core", "calib_session"];
const DEPENDENCY_CAP: LevelFilter = LevelFilter::Warn;

fn is_own_target(target: &str) -> bool {
    OWN_TARGETS.iter().any(|own| target.starts_with(own))
}

/// Last path segment of a log target, `calib_session::session::mono` -> `mono`.
fn short_target(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

struct SessionLogger {
    level: LevelFilter,
    started: Instant,
}

impl SessionLogger {
    fn limit_for(&self, target: &str) -> LevelFilter {
        if is_own_target(target) {
            self.level
        } else {
            self.level.min(DEPENDENCY_CAP)
        }
    }
}

impl Log for SessionLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.limit_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let secs = self.started.elapsed().as_secs_f64();
        let _ = writeln!(
            std::io::stderr().lock(),
            "[{secs:8.3}s {:>5} {}] {}",
            record.level(),
            short_target(record.target()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<SessionLogger> = OnceLock::new();

/// Install the session logger.
///
/// Only the first call installs anything; later calls return `Ok(())`.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| SessionLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Install the session logger with the level named in `CALIB_SESSION_LOG`,
/// falling back to `default` when it is unset or unparsable.
pub fn init_from_env(default: LevelFilter) -> Result<(), log::SetLoggerError> {
    init_with_level(level_from_env(default))
}

fn level_from_env(default: LevelFilter) -> LevelFilter {
    std::env::var(LOG_ENV_VAR)
        .ok()
        .and_then(|raw| LevelFilter::from_str(raw.trim()).ok())
        .unwrap_or(default)
}

/// Filter used when `RUST_LOG` is unset: session crates at the level from
/// `CALIB_SESSION_LOG` (default `info`), everything else at `warn`.
#[cfg(feature = "tracing")]
fn default_directives() -> String {
    let level = level_from_env(LevelFilter::Info);
    let mut directives = DEPENDENCY_CAP.to_string().to_lowercase();
    for own in OWN_TARGETS {
        directives.push_str(&format!(",{own}={}", level.to_string().to_lowercase()));
    }
    directives
}

/// Install a `tracing` subscriber; `json` selects flattened JSON events.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives()));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_records_are_capped_at_warn() {
        let logger = SessionLogger {
            level: LevelFilter::Debug,
            started: Instant::now(),
        };
        assert_eq!(logger.limit_for("calib_session::session::mono"), LevelFilter::Debug);
        assert_eq!(logger.limit_for("calib_session_core::collector"), LevelFilter::Debug);
        assert_eq!(logger.limit_for("calib_targets::detect"), LevelFilter::Warn);

        let quiet = SessionLogger {
            level: LevelFilter::Error,
            started: Instant::now(),
        };
        assert_eq!(quiet.limit_for("calib_targets::detect"), LevelFilter::Error);
    }

    #[test]
    fn short_target_keeps_last_segment() {
        assert_eq!(short_target("calib_session::session::mono"), "mono");
        assert_eq!(short_target("calib_session"), "calib_session");
    }
}
