use std::{
    ffi::OsString,
    io,
    path::Path,
    process::{Child, Command, Stdio},
    str::FromStr,
};

use crate::config::Layout;
use crate::env::{self, LaunchEnvironment};
use crate::error::LaunchError;
use crate::paths::{self, RuntimeDescriptor, SelfLocation};

pub const MODE_ENV_VAR: &str = "LAUNCHER_MODE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// No console window, do not wait for the child.
    Detached,
    /// Inherit the console and wait for the child's exit code.
    Attended,
}

impl FromStr for LaunchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detached" => Ok(LaunchMode::Detached),
            "attended" => Ok(LaunchMode::Attended),
            other => Err(format!("unknown launch mode {other:?}")),
        }
    }
}

/// Outcome of mode selection. `rejected` holds an unusable `LAUNCHER_MODE`
/// so it can be logged once logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeSelection {
    pub mode: LaunchMode,
    pub rejected: Option<String>,
}

/// `LAUNCHER_MODE` wins, then a `debug` exe name, then the configured default.
pub fn select_mode(env_value: Option<&str>, exe_stem: Option<&str>, default: LaunchMode) -> ModeSelection {
    let mut rejected = None;
    if let Some(raw) = env_value.filter(|v| !v.trim().is_empty()) {
        match raw.parse() {
            Ok(mode) => return ModeSelection { mode, rejected: None },
            Err(err) => rejected = Some(format!("ignoring {MODE_ENV_VAR}: {err}")),
        }
    }
    let debug_name = exe_stem
        .map(|s| s.to_ascii_lowercase().contains("debug"))
        .unwrap_or(false);
    let mode = if debug_name { LaunchMode::Attended } else { default };
    ModeSelection { mode, rejected }
}

/// Owns the spawned child for as long as the launcher still cares about it.
#[derive(Debug)]
pub struct ChildProcessHandle {
    pid: u32,
    child: Option<Child>,
}

impl ChildProcessHandle {
    fn released(child: Child) -> Self {
        let pid = child.id();
        // Dropping a `Child` closes our handles without touching the process.
        drop(child);
        Self { pid, child: None }
    }

    fn retained(child: Child) -> Self {
        Self {
            pid: child.id(),
            child: Some(child),
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn is_released(&self) -> bool {
        self.child.is_none()
    }

    /// Blocks until the child exits. A released handle reports success immediately.
    pub fn wait(mut self) -> Result<i32, LaunchError> {
        let Some(mut child) = self.child.take() else {
            return Ok(0);
        };
        let status = child.wait().map_err(LaunchError::WaitFailed)?;
        Ok(status.code().unwrap_or(1))
    }
}

pub fn build_command(
    descriptor: &RuntimeDescriptor,
    env: &LaunchEnvironment,
    mode: LaunchMode,
    args: &[OsString],
) -> Command {
    let mut cmd = Command::new(&descriptor.runtime_path);
    cmd.arg(&descriptor.entry_point)
        .args(args)
        .current_dir(descriptor.self_location.as_path())
        .env_clear()
        .envs(env.iter());
    match mode {
        LaunchMode::Detached => {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
            #[cfg(windows)]
            {
                use std::os::windows::process::CommandExt;
                const CREATE_NO_WINDOW: u32 = 0x08000000;
                cmd.creation_flags(CREATE_NO_WINDOW);
            }
        }
        LaunchMode::Attended => {
            cmd.stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        }
    }
    cmd
}

pub fn launch(
    descriptor: &RuntimeDescriptor,
    env: &LaunchEnvironment,
    mode: LaunchMode,
    args: &[OsString],
    mut spawn: impl FnMut(&mut Command) -> io::Result<Child>,
) -> Result<ChildProcessHandle, LaunchError> {
    let mut cmd = build_command(descriptor, env, mode, args);
    tracing::info!("> {}", format_command(&cmd));
    let child = spawn(&mut cmd)
        .map_err(|err| LaunchError::launch_failed(&descriptor.runtime_path, err))?;
    tracing::info!(pid = child.id(), ?mode, "child started");
    Ok(match mode {
        LaunchMode::Detached => ChildProcessHandle::released(child),
        LaunchMode::Attended => ChildProcessHandle::retained(child),
    })
}

pub fn run(self_location: &SelfLocation, mode: LaunchMode, args: &[OsString]) -> Result<i32, LaunchError> {
    run_with_spawner(
        self_location,
        &Layout::bundled(),
        mode,
        args,
        std::env::vars_os(),
        |cmd| cmd.spawn(),
    )
}

/// Resolve, verify, build the environment, launch, and for attended mode wait.
/// Returns the process exit code for the launcher.
pub fn run_with_spawner<I, K, V>(
    self_location: &SelfLocation,
    layout: &Layout,
    mode: LaunchMode,
    args: &[OsString],
    base_env: I,
    spawn: impl FnMut(&mut Command) -> io::Result<Child>,
) -> Result<i32, LaunchError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<OsString>,
    V: Into<OsString>,
{
    let descriptor = paths::resolve_runtime(self_location, layout, mode);
    tracing::info!(
        runtime = %descriptor.runtime_path.display(),
        library = %descriptor.library_path.display(),
        entry = %descriptor.entry_point.display(),
        "resolved runtime"
    );

    paths::verify_runtime(&descriptor)?;
    warn_if_entry_missing(&descriptor.entry_point);

    let env = env::build_environment(&descriptor, base_env);
    let handle = launch(&descriptor, &env, mode, args, spawn)?;
    if handle.is_released() {
        return Ok(0);
    }

    let pid = handle.pid();
    let code = handle.wait()?;
    tracing::info!(pid, code, "child exited");
    Ok(code)
}

fn warn_if_entry_missing(entry: &Path) {
    if !entry.exists() {
        tracing::warn!("entry point {} not found; starting runtime anyway", entry.display());
    }
}

fn format_command(cmd: &Command) -> String {
    let program = cmd.get_program().to_string_lossy();
    let args = cmd
        .get_args()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ");
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{program} {args}")
    }
}
