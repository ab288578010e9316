include!(concat!(env!("OUT_DIR"), "/launcher_config.rs"));

/// Fixed, bundle-relative locations the launcher resolves against its own directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub runtime: String,
    /// Interpreter used in attended mode. Empty means "same as `runtime`".
    pub console_runtime: String,
    pub library_dir: String,
    pub entry_point: String,
    pub search_path_var: String,
}

impl Layout {
    pub fn bundled() -> Self {
        Self {
            runtime: RUNTIME.to_string(),
            console_runtime: CONSOLE_RUNTIME.to_string(),
            library_dir: LIBRARY_DIR.to_string(),
            entry_point: ENTRY_POINT.to_string(),
            search_path_var: SEARCH_PATH_VAR.to_string(),
        }
    }
}

pub fn window_title() -> &'static str {
    if !PRODUCT_NAME.trim().is_empty() {
        PRODUCT_NAME
    } else if !NAME.trim().is_empty() {
        NAME
    } else {
        "Error"
    }
}
