//! Starts a bundled interpreter that sits next to the launcher executable.
//!
//! Two binaries share this entry point: `launcher` (GUI subsystem on Windows,
//! detached by default) and `launcher-debug` (console subsystem, attended).

mod config;
mod console;
mod env;
mod error;
mod logging;
mod paths;
mod report;
mod runner;

use std::ffi::OsString;

pub use runner::LaunchMode;

/// Runs the whole launch and returns the exit code for the launcher process.
pub fn run_launcher() -> i32 {
    let selection = startup_mode();
    let mode = selection.mode;
    let has_console = mode == LaunchMode::Attended && console::ensure_attached();
    let presenter = report::presenter_for(mode, has_console);
    let title = config::window_title();

    let self_location = match paths::locate_self() {
        Ok(loc) => loc,
        Err(err) => {
            report::report_error(presenter.as_ref(), title, &err);
            return err.exit_code();
        }
    };

    // A read-only install directory just means no log file.
    if let Err(err) = logging::init(self_location.as_path()) {
        if let Some(notice) = log_failure_notice(has_console, &err) {
            eprintln!("{notice}");
        }
    }
    tracing::info!(app = config::APP_ID, version = config::VERSION, ?mode, "launcher starting");
    if let Some(rejected) = &selection.rejected {
        tracing::warn!("{rejected}");
    }

    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    match runner::run(&self_location, mode, &args) {
        Ok(code) => code,
        Err(err) => {
            report::report_error(presenter.as_ref(), title, &err);
            err.exit_code()
        }
    }
}

fn startup_mode() -> runner::ModeSelection {
    let default = config::DEFAULT_MODE.parse().unwrap_or(LaunchMode::Detached);
    let env_value = std::env::var(runner::MODE_ENV_VAR).ok();
    let exe_stem = std::env::current_exe().ok().and_then(|exe| {
        exe.file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
    });
    runner::select_mode(env_value.as_deref(), exe_stem.as_deref(), default)
}

/// Only a console run has somewhere to say that the log file is missing.
fn log_failure_notice(has_console: bool, err: &anyhow::Error) -> Option<String> {
    has_console.then(|| format!("warning: continuing without a log file: {err:#}"))
}
