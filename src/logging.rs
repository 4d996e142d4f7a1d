use std::{env, fs, io};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    constants::{FILE_PATHS, LOG_ENV_VAR},
    storage,
};

pub enum LogTarget {
    /// Log file under the state directory; the terminal UI owns stderr.
    StateFile,
    Stderr,
}

/// Installs the global subscriber. Logging stays off unless `FORMULARY_LOG`
/// names a level or filter directive. Keep the returned guard alive until
/// exit so buffered lines are flushed.
pub fn init_logging(target: LogTarget) -> Option<WorkerGuard> {
    let level = env::var(LOG_ENV_VAR).unwrap_or_else(|_| "off".to_string());
    if level.eq_ignore_ascii_case("off") {
        return None;
    }

    let env_filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));

    let (writer, guard) = match make_writer(target) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Warning: Could not open log file: {}", e);
            return None;
        }
    };

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_target(true),
        )
        .try_init();

    if let Err(e) = result {
        eprintln!("Warning: Could not install logger: {}", e);
        return None;
    }

    Some(guard)
}

fn make_writer(target: LogTarget) -> io::Result<(NonBlocking, WorkerGuard)> {
    match target {
        LogTarget::StateFile => {
            let dir = storage::get_state_dir();
            fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::never(dir, FILE_PATHS.log_file);
            Ok(tracing_appender::non_blocking(appender))
        }
        LogTarget::Stderr => Ok(tracing_appender::non_blocking(io::stderr())),
    }
}
