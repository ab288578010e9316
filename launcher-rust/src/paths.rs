use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf, MAIN_SEPARATOR},
};

use crate::config::Layout;
use crate::error::LaunchError;
use crate::runner::LaunchMode;

/// Directory holding the running launcher executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfLocation(PathBuf);

impl SelfLocation {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self(dir.into())
    }

    pub fn from_exe(exe: &Path) -> Option<Self> {
        exe.parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Self::new)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn with_trailing_separator(&self) -> OsString {
        let mut out = self.0.clone().into_os_string();
        let ends_with_sep = out
            .to_string_lossy()
            .ends_with(|c: char| c == MAIN_SEPARATOR || c == '/');
        if !ends_with_sep {
            out.push(MAIN_SEPARATOR.to_string());
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeDescriptor {
    pub self_location: SelfLocation,
    pub runtime_path: PathBuf,
    pub library_path: PathBuf,
    pub entry_point: PathBuf,
    pub search_path_var: OsString,
}

pub fn locate_self() -> Result<SelfLocation, LaunchError> {
    let exe = std::env::current_exe().map_err(LaunchError::SelfLocationUnavailable)?;
    // A relative exe path would make every later join depend on the working directory.
    let exe = if exe.is_absolute() {
        exe
    } else {
        fs::canonicalize(&exe).map_err(LaunchError::SelfLocationUnavailable)?
    };
    SelfLocation::from_exe(&exe).ok_or_else(|| {
        LaunchError::SelfLocationUnavailable(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} has no parent directory", exe.display()),
        ))
    })
}

pub fn resolve_runtime(self_location: &SelfLocation, layout: &Layout, mode: LaunchMode) -> RuntimeDescriptor {
    let runtime_rel = match mode {
        LaunchMode::Attended if !layout.console_runtime.trim().is_empty() => &layout.console_runtime,
        _ => &layout.runtime,
    };
    let base = self_location.as_path();
    RuntimeDescriptor {
        self_location: self_location.clone(),
        runtime_path: join_relative(base, runtime_rel),
        library_path: join_relative(base, &layout.library_dir),
        entry_point: join_relative(base, &layout.entry_point),
        search_path_var: OsString::from(&layout.search_path_var),
    }
}

pub fn verify_runtime(descriptor: &RuntimeDescriptor) -> Result<(), LaunchError> {
    match fs::metadata(&descriptor.runtime_path) {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(LaunchError::RuntimeMissing {
            path: descriptor.runtime_path.clone(),
        }),
    }
}

/// Joins a config path written with either `/` or `\` onto `base`.
pub fn join_relative(base: &Path, rel: &str) -> PathBuf {
    rel.split(['/', '\\'])
        .filter(|piece| !piece.is_empty() && *piece != ".")
        .fold(base.to_path_buf(), |acc, piece| acc.join(piece))
}
