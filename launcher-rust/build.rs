use serde::Deserialize;
use std::{
    fs,
    io,
    path::{Component, Path, PathBuf},
};

#[derive(Debug, Deserialize)]
struct Config {
    app_id: String,
    name: String,
    product_name: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    description: String,
    version: String,
    #[serde(default)]
    icon: String,
    runtime: String,
    #[serde(default)]
    console_runtime: String,
    library_dir: String,
    entry_point: String,
    search_path_var: String,
    #[serde(default = "default_mode")]
    default_mode: String,
}

fn default_mode() -> String {
    "detached".to_string()
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let manifest_dir = PathBuf::from(manifest_dir);
    let repo_root = manifest_dir.join("..");
    let config = load_config(&repo_root).unwrap_or_else(|err| {
        panic!("failed to load config.toml: {err}");
    });

    if let Err(err) = validate_layout(&config) {
        panic!("invalid bundle layout in config.toml: {err}");
    }

    if let Err(err) = embed_icon(&repo_root, &config) {
        panic!("failed to embed icon: {err}");
    }

    let out_dir = std::env::var("OUT_DIR").expect("OUT_DIR not set");
    if let Err(err) = write_config_rs(&PathBuf::from(out_dir), &config) {
        panic!("failed to write config: {err}");
    }
}

fn load_config(repo_root: &Path) -> io::Result<Config> {
    let config_path = repo_root.join("config.toml");
    println!("cargo:rerun-if-changed={}", config_path.display());
    let contents = fs::read_to_string(&config_path)?;
    let cfg: Config = toml::from_str(&contents)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    Ok(cfg)
}

fn validate_layout(config: &Config) -> Result<(), String> {
    let required = [
        ("runtime", &config.runtime),
        ("library_dir", &config.library_dir),
        ("entry_point", &config.entry_point),
    ];
    for (key, value) in required {
        if value.trim().is_empty() {
            return Err(format!("{key} is empty"));
        }
        check_relative(key, value)?;
    }
    if !config.console_runtime.trim().is_empty() {
        check_relative("console_runtime", &config.console_runtime)?;
    }
    if config.search_path_var.trim().is_empty() || config.search_path_var.contains('=') {
        return Err(format!("search_path_var {:?} is not a valid variable name", config.search_path_var));
    }
    match config.default_mode.trim().to_ascii_lowercase().as_str() {
        "detached" | "attended" => Ok(()),
        other => Err(format!("default_mode must be detached or attended, got {other:?}")),
    }
}

// Both separators are accepted in config.toml, so check each piece on its own.
fn check_relative(key: &str, value: &str) -> Result<(), String> {
    if value.starts_with('/') || value.starts_with('\\') || value.contains(':') {
        return Err(format!("{key} must be relative to the launcher, got {value:?}"));
    }
    for piece in value.split(['/', '\\']) {
        if Path::new(piece)
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_) | Component::RootDir))
        {
            return Err(format!("{key} must stay inside the bundle, got {value:?}"));
        }
    }
    Ok(())
}

fn embed_icon(repo_root: &Path, config: &Config) -> io::Result<()> {
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows") {
        return Ok(());
    }
    let icon_path = resolve_icon_path(repo_root, config);
    let mut res = winres::WindowsResource::new();
    if let Some(icon_path) = icon_path {
        res.set_icon(icon_path.to_string_lossy().as_ref());
    }
    if !config.product_name.is_empty() {
        res.set("ProductName", &config.product_name);
    }
    if !config.description.is_empty() {
        res.set("FileDescription", &config.description);
    }
    if !config.company.is_empty() {
        res.set("CompanyName", &config.company);
    }
    if !config.version.is_empty() {
        res.set("FileVersion", &config.version);
        res.set("ProductVersion", &config.version);
    }
    if !config.app_id.is_empty() {
        res.set("InternalName", &config.app_id);
    }
    res.compile()?;
    Ok(())
}

fn resolve_icon_path(repo_root: &Path, config: &Config) -> Option<PathBuf> {
    if !config.icon.is_empty() {
        let candidate = repo_root.join(&config.icon);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    let assets_dir = repo_root.join("assets");
    if !assets_dir.exists() {
        return None;
    }
    let mut ico_paths: Vec<PathBuf> = fs::read_dir(&assets_dir).ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|e| e.eq_ignore_ascii_case("ico")).unwrap_or(false))
        .collect();
    ico_paths.sort();
    ico_paths.first().cloned()
}

fn write_config_rs(out_dir: &Path, config: &Config) -> io::Result<()> {
    use std::io::Write;
    let out_path = out_dir.join("launcher_config.rs");
    let mut file = fs::File::create(&out_path)?;
    writeln!(file, "pub const APP_ID: &str = {:?};", config.app_id)?;
    writeln!(file, "pub const NAME: &str = {:?};", config.name)?;
    writeln!(file, "pub const PRODUCT_NAME: &str = {:?};", config.product_name)?;
    writeln!(file, "pub const VERSION: &str = {:?};", config.version)?;
    writeln!(file, "pub const RUNTIME: &str = {:?};", config.runtime.trim())?;
    writeln!(file, "pub const CONSOLE_RUNTIME: &str = {:?};", config.console_runtime.trim())?;
    writeln!(file, "pub const LIBRARY_DIR: &str = {:?};", config.library_dir.trim())?;
    writeln!(file, "pub const ENTRY_POINT: &str = {:?};", config.entry_point.trim())?;
    writeln!(file, "pub const SEARCH_PATH_VAR: &str = {:?};", config.search_path_var.trim())?;
    writeln!(
        file,
        "pub const DEFAULT_MODE: &str = {:?};",
        config.default_mode.trim().to_ascii_lowercase()
    )?;
    Ok(())
}
