#![cfg_attr(windows, windows_subsystem = "windows")]

fn main() {
    std::process::exit(bundle_launcher::run_launcher());
}
