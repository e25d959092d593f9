//! Logging configuration with file-based output and size-based rotation.
//!
//! Writes logs to `squad_ready.log` inside the directory the plugin keeps its
//! settings in, with 10 MB size-based rotation. Set `DEBUG_LOGGING=1` to
//! enable debug output for the squad ready crates.

use std::path::Path;
use std::sync::Once;

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub const LOG_FILE_NAME: &str = "squad_ready.log";

const DEBUG_DIRECTIVE: &str = "info,squad_ready=debug,squad_ready_core=debug";

/// Initialize logging with dual-output (file + stdout).
///
/// Returns a `WorkerGuard` that MUST be held until the plugin is released
/// so buffered log lines are flushed.
///
/// The plugin can be loaded more than once per process and the host may
/// already have a subscriber, so an existing global subscriber is left alone.
///
/// # Fallback
/// If the log file cannot be created, returns `None` and logs to stdout only.
pub fn init(log_dir: &Path) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    if let Err(e) = std::fs::create_dir_all(log_dir) {
        // Subscriber not installed yet
        eprintln!(
            "Failed to create log directory {:?}: {}, using stdout only",
            log_dir, e
        );
        init_stdout_only(debug_logging);
        return None;
    }

    let log_path = log_dir.join(LOG_FILE_NAME);
    let file_appender = match BasicRollingFileAppender::new(
        &log_path,
        RollingConditionBasic::new().max_size(10 * 1024 * 1024),
        1, // squad_ready.log and squad_ready.log.1
    ) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Failed to create log file at {:?}: {}", log_path, e);
            init_stdout_only(debug_logging);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .with(filter(debug_logging))
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(log_file = ?log_path, debug_logging, "squad ready logging initialized");
        Some(guard)
    } else {
        None
    }
}

fn filter(debug_logging: bool) -> EnvFilter {
    EnvFilter::new(if debug_logging { DEBUG_DIRECTIVE } else { "info" })
}

/// Fallback: stdout-only logging when file logging fails.
fn init_stdout_only(debug_logging: bool) {
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    if tracing_subscriber::registry()
        .with(stdout_layer)
        .with(filter(debug_logging))
        .try_init()
        .is_ok()
    {
        tracing::info!(debug_logging, "squad ready logging initialized (stdout only)");
    }
}

static PANIC_HOOK: Once = Once::new();

/// Route panics on plugin threads into the log before the previous hook runs.
///
/// Installs at most once per process, so reloading the plugin does not stack
/// hooks. Returns true if this call installed it.
pub fn install_panic_hook() -> bool {
    let mut installed = false;
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let location = info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_default();
            tracing::error!(%location, panic = %info, "panic");
            previous(info);
        }));
        installed = true;
    });
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_hook_installs_once() {
        assert!(install_panic_hook());
        assert!(!install_panic_hook());
        assert!(!install_panic_hook());
    }
}
