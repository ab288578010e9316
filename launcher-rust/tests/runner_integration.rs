#[path = "../src/config.rs"]
mod config;
#[path = "../src/env.rs"]
mod env;
#[path = "../src/error.rs"]
mod error;
#[path = "../src/paths.rs"]
mod paths;
#[path = "../src/runner.rs"]
mod runner;

use std::{
    ffi::OsString,
    fs,
    io,
    path::Path,
    process::{Child, Command},
};

use config::Layout;
use error::LaunchError;
use paths::SelfLocation;
use runner::LaunchMode;

fn layout() -> Layout {
    Layout {
        runtime: "runtime/exe".to_string(),
        console_runtime: String::new(),
        library_dir: "lib".to_string(),
        entry_point: "entry.script".to_string(),
        search_path_var: "PYTHONPATH".to_string(),
    }
}

fn recorded(cmd: &Command) -> (OsString, Vec<OsString>) {
    (
        cmd.get_program().to_os_string(),
        cmd.get_args().map(|a| a.to_os_string()).collect(),
    )
}

/// `runtime/exe` is a symlink to the system shell, so `entry.script` runs as a shell script.
#[cfg(unix)]
fn shell_bundle(root: &Path, script: &str) {
    fs::create_dir_all(root.join("runtime")).unwrap();
    fs::create_dir_all(root.join("lib")).unwrap();
    std::os::unix::fs::symlink("/bin/sh", root.join("runtime").join("exe")).unwrap();
    fs::write(root.join("entry.script"), script).unwrap();
}

#[test]
fn missing_runtime_fails_before_spawning() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("entry.script"), "").unwrap();
    let loc = SelfLocation::new(tmp.path());

    let mut spawned = 0;
    let result = runner::run_with_spawner(
        &loc,
        &layout(),
        LaunchMode::Detached,
        &[OsString::from("--gui")],
        std::env::vars_os(),
        |_cmd: &mut Command| -> io::Result<Child> {
            spawned += 1;
            Err(io::Error::from_raw_os_error(2))
        },
    );

    let err = result.unwrap_err();
    let expected = tmp.path().join("runtime").join("exe");
    assert!(matches!(&err, LaunchError::RuntimeMissing { path } if *path == expected));
    assert!(err.to_string().contains(&expected.display().to_string()));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(spawned, 0);
}

#[test]
fn spawn_receives_runtime_entry_and_passthrough() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("runtime")).unwrap();
    fs::write(tmp.path().join("runtime").join("exe"), "bin").unwrap();
    let loc = SelfLocation::new(tmp.path());

    let mut seen = Vec::new();
    let result = runner::run_with_spawner(
        &loc,
        &layout(),
        LaunchMode::Detached,
        &[OsString::from("--gui")],
        vec![("PATH", "/usr/bin")],
        |cmd: &mut Command| -> io::Result<Child> {
            seen.push(recorded(cmd));
            Err(io::Error::from_raw_os_error(8))
        },
    );

    assert!(matches!(result, Err(LaunchError::LaunchFailed { code: Some(8), .. })));
    assert_eq!(seen.len(), 1);
    let (program, args) = &seen[0];
    assert_eq!(program, tmp.path().join("runtime").join("exe").as_os_str());
    assert_eq!(
        args,
        &vec![
            tmp.path().join("entry.script").into_os_string(),
            OsString::from("--gui"),
        ]
    );
}

#[cfg(unix)]
#[test]
fn detached_gui_launch_exits_zero() {
    let tmp = tempfile::tempdir().unwrap();
    shell_bundle(tmp.path(), "exit 0\n");
    let loc = SelfLocation::new(tmp.path());

    let mut seen = Vec::new();
    let code = runner::run_with_spawner(
        &loc,
        &layout(),
        LaunchMode::Detached,
        &[OsString::from("--gui")],
        std::env::vars_os(),
        |cmd: &mut Command| {
            seen.push(recorded(cmd));
            cmd.spawn()
        },
    )
    .unwrap();

    assert_eq!(code, 0);
    let (program, args) = &seen[0];
    assert_eq!(program, tmp.path().join("runtime").join("exe").as_os_str());
    assert_eq!(args[0], tmp.path().join("entry.script").into_os_string());
    assert_eq!(args[1], OsString::from("--gui"));
}

#[cfg(unix)]
#[test]
fn detached_does_not_wait_for_slow_child() {
    let tmp = tempfile::tempdir().unwrap();
    shell_bundle(tmp.path(), "sleep 3\n: > finished\n");
    let loc = SelfLocation::new(tmp.path());

    let started = std::time::Instant::now();
    let code = runner::run_with_spawner(
        &loc,
        &layout(),
        LaunchMode::Detached,
        &[],
        std::env::vars_os(),
        |cmd: &mut Command| cmd.spawn(),
    )
    .unwrap();

    assert_eq!(code, 0);
    assert!(started.elapsed() < std::time::Duration::from_secs(3));
    assert!(!tmp.path().join("finished").exists());
}

#[cfg(unix)]
#[test]
fn attended_propagates_child_exit_code() {
    for expected in [0, 1, 42] {
        let tmp = tempfile::tempdir().unwrap();
        shell_bundle(tmp.path(), "exit \"$1\"\n");
        let loc = SelfLocation::new(tmp.path());

        let code = runner::run_with_spawner(
            &loc,
            &layout(),
            LaunchMode::Attended,
            &[OsString::from(expected.to_string())],
            std::env::vars_os(),
            |cmd: &mut Command| cmd.spawn(),
        )
        .unwrap();

        assert_eq!(code, expected);
    }
}

#[cfg(unix)]
#[test]
fn child_sees_search_path_and_bundle_cwd() {
    let tmp = tempfile::tempdir().unwrap();
    shell_bundle(
        tmp.path(),
        "printf '%s' \"$PYTHONPATH\" > search_path.txt\npwd -P > cwd.txt\n",
    );
    let loc = SelfLocation::new(tmp.path());

    let code = runner::run_with_spawner(
        &loc,
        &layout(),
        LaunchMode::Attended,
        &[],
        vec![("PATH", "/usr/bin:/bin"), ("PYTHONPATH", "/elsewhere")],
        |cmd: &mut Command| cmd.spawn(),
    )
    .unwrap();
    assert_eq!(code, 0);

    let search_path = fs::read_to_string(tmp.path().join("search_path.txt")).unwrap();
    let mut parts = search_path.split(':');
    assert_eq!(parts.next(), Some(tmp.path().join("lib").to_str().unwrap()));
    let second = parts.next().unwrap();
    assert_eq!(Path::new(second), tmp.path());
    assert!(!search_path.contains("/elsewhere"));

    let cwd = fs::read_to_string(tmp.path().join("cwd.txt")).unwrap();
    assert_eq!(
        Path::new(cwd.trim()),
        fs::canonicalize(tmp.path()).unwrap()
    );
}
