//! The launcher is built for the GUI subsystem on Windows, so attended runs
//! have to go find a console before printing or spawning anything.

#[cfg(windows)]
pub fn ensure_attached() -> bool {
    use windows_sys::Win32::System::Console::{
        AllocConsole, AttachConsole, GetConsoleWindow, ATTACH_PARENT_PROCESS,
    };

    unsafe {
        if GetConsoleWindow() != 0 {
            return true;
        }
        if AttachConsole(ATTACH_PARENT_PROCESS) != 0 {
            return true;
        }
        AllocConsole() != 0
    }
}

#[cfg(not(windows))]
pub fn ensure_attached() -> bool {
    true
}
