use std::io::{self, BufRead, Write};

use crate::error::LaunchError;
use crate::runner::LaunchMode;

pub const PAUSE_PROMPT: &str = "Press Enter to exit...";

/// Where user-facing failures go. The launcher has no other way to talk to the user.
pub trait Presenter {
    fn present_error(&self, title: &str, message: &str);
}

/// Console output followed by a pause, so the window does not vanish unread.
pub struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn present_error(&self, title: &str, message: &str) {
        let stderr = io::stderr();
        let stdin = io::stdin();
        let _ = write_and_pause(&mut stderr.lock(), &mut stdin.lock(), title, message);
    }
}

/// Modal message box; used when there is no console to write to.
pub struct DialogPresenter;

impl Presenter for DialogPresenter {
    #[cfg(windows)]
    fn present_error(&self, title: &str, message: &str) {
        use std::ffi::OsStr;
        use std::iter::once;
        use std::os::windows::ffi::OsStrExt;
        use windows_sys::Win32::UI::WindowsAndMessaging::{MessageBoxW, MB_ICONERROR, MB_OK};

        let text: Vec<u16> = OsStr::new(message).encode_wide().chain(once(0)).collect();
        let caption: Vec<u16> = OsStr::new(title).encode_wide().chain(once(0)).collect();
        unsafe { MessageBoxW(0, text.as_ptr(), caption.as_ptr(), MB_OK | MB_ICONERROR) };
    }

    #[cfg(not(windows))]
    fn present_error(&self, title: &str, message: &str) {
        eprintln!("[{title}] {message}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterKind {
    Console,
    Dialog,
}

/// Console only when attended and a console is really there; a GUI-subsystem
/// process that failed to get one would otherwise write into a null handle.
pub fn presenter_kind(mode: LaunchMode, has_console: bool) -> PresenterKind {
    match mode {
        LaunchMode::Attended if has_console => PresenterKind::Console,
        _ => PresenterKind::Dialog,
    }
}

pub fn presenter_for(mode: LaunchMode, has_console: bool) -> Box<dyn Presenter> {
    match presenter_kind(mode, has_console) {
        PresenterKind::Console => Box::new(ConsolePresenter),
        PresenterKind::Dialog => Box::new(DialogPresenter),
    }
}

pub fn report_error(presenter: &dyn Presenter, title: &str, err: &LaunchError) {
    tracing::error!("{err}");
    presenter.present_error(title, &err.to_string());
}

fn write_and_pause(
    out: &mut impl Write,
    input: &mut impl BufRead,
    title: &str,
    message: &str,
) -> io::Result<()> {
    writeln!(out, "{title}: {message}")?;
    write!(out, "{PAUSE_PROMPT}")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}
