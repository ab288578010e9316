use std::{io, path::PathBuf};

/// Everything the launcher itself can fail at. All variants end the launch attempt.
///
/// The `Display` text is what the user sees, so it is written for them rather than for a log.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("Failed to get executable path.\n\n{0}")]
    SelfLocationUnavailable(#[source] io::Error),

    #[error(
        "Runtime not found at:\n{}\n\nPlease ensure the bundle was extracted completely.",
        path.display()
    )]
    RuntimeMissing { path: PathBuf },

    #[error(
        "Failed to launch process:\n{}\nError code: {}",
        program.display(),
        code.map(|c| c.to_string()).unwrap_or_else(|| "unknown".to_string())
    )]
    LaunchFailed {
        program: PathBuf,
        code: Option<i32>,
        #[source]
        source: io::Error,
    },

    #[error("Lost track of the launched process.\n\n{0}")]
    WaitFailed(#[source] io::Error),
}

impl LaunchError {
    pub fn launch_failed(program: impl Into<PathBuf>, source: io::Error) -> Self {
        LaunchError::LaunchFailed {
            program: program.into(),
            code: source.raw_os_error(),
            source,
        }
    }

    pub fn exit_code(&self) -> i32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_missing_names_the_path() {
        let path = PathBuf::from("bundle").join("base_env").join("pythonw.exe");
        let err = LaunchError::RuntimeMissing { path: path.clone() };
        assert!(err.to_string().contains(&path.display().to_string()));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn launch_failed_carries_os_code() {
        let err = LaunchError::launch_failed("python.exe", io::Error::from_raw_os_error(5));
        match &err {
            LaunchError::LaunchFailed { code, .. } => assert_eq!(*code, Some(5)),
            other => panic!("unexpected {other:?}"),
        }
        assert!(err.to_string().contains("Error code: 5"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn launch_failed_without_os_code() {
        let err = LaunchError::launch_failed("python.exe", io::Error::new(io::ErrorKind::Other, "boom"));
        assert!(err.to_string().contains("Error code: unknown"));
    }
}
