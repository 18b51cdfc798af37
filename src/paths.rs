use std::path::PathBuf;

/// Returns the root catalog directory path.
///
/// Resolution order:
/// 1. `CATALOG_ROOT` environment variable (if set)
/// 2. Current working directory + `.catalog`
pub fn catalog_root() -> PathBuf {
    if let Ok(root) = std::env::var("CATALOG_ROOT") {
        PathBuf::from(root)
    } else {
        PathBuf::from(".catalog")
    }
}

/// Per-user configuration directory, used when no local config exists.
pub fn user_config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "catalog", "catalog")
        .map(|dirs| dirs.config_dir().to_path_buf())
}
