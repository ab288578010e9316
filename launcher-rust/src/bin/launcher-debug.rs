// Console-subsystem build: the shell waits for it, so %ERRORLEVEL% sees the child's code.
// The `debug` file stem selects attended mode unless LAUNCHER_MODE says otherwise.
fn main() {
    std::process::exit(bundle_launcher::run_launcher());
}
