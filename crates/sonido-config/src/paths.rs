//! Platform-specific paths for saved graphs and configuration.
//!
//! # Directory Structure
//!
//! - **User graphs**: `~/.config/sonido/graphs/` (Linux), `~/Library/Application Support/sonido/graphs/` (macOS), `%APPDATA%\sonido\graphs\` (Windows)
//! - **User config**: `~/.config/sonido/` (Linux), `~/Library/Application Support/sonido/` (macOS), `%APPDATA%\sonido\` (Windows)

use std::path::PathBuf;

/// Application name used for directory paths.
const APP_NAME: &str = "sonido";

/// Subdirectory name for saved graph topologies.
const GRAPHS_SUBDIR: &str = "graphs";

/// Returns the user-specific saved-graphs directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_graphs_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join(GRAPHS_SUBDIR)
}

/// Returns the user-specific configuration directory (holds `defaults.toml`).
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_NAME)
}

/// Find a saved graph file by name.
///
/// `name` may be an absolute/relative path to a JSON file, or a bare name
/// (with or without `.json`) resolved against [`user_graphs_dir`].
pub fn find_graph(name: &str) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".json") { name.to_string() } else { format!("{name}.json") };
    let user_path = user_graphs_dir().join(&filename);
    if user_path.is_file() {
        return Some(user_path);
    }

    None
}

/// Ensure the user graphs directory exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_graphs_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_graphs_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// Ensure the user config directory exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_config_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_config_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// List all saved graph files in the user graphs directory.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_user_graphs() -> Vec<PathBuf> {
    let dir = user_graphs_dir();
    let Ok(entries) = std::fs::read_dir(&dir) else {
        return Vec::new();
    };
    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().map(|ext| ext == "json").unwrap_or(false))
        .collect()
}

/// Get the graph name from a file path (the file stem).
pub fn graph_name_from_path(path: &std::path::Path) -> Option<String> {
    path.file_stem().and_then(|s| s.to_str()).map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn user_graphs_dir_contains_app_name() {
        let dir = user_graphs_dir();
        let dir_str = dir.to_string_lossy();
        assert!(dir_str.contains("sonido") || dir_str.contains("graphs"));
    }

    #[test]
    fn user_config_dir_contains_app_name() {
        assert!(user_config_dir().to_string_lossy().contains("sonido"));
    }

    #[test]
    fn find_graph_by_full_path() {
        let temp_dir = TempDir::new().unwrap();
        let graph_path = temp_dir.path().join("test.json");
        fs::write(&graph_path, "{}").unwrap();

        let found = find_graph(graph_path.to_str().unwrap());
        assert_eq!(found, Some(graph_path));
    }

    #[test]
    fn find_graph_not_found_is_none() {
        assert!(find_graph("nonexistent_graph_12345").is_none());
    }

    #[test]
    fn graph_name_from_path_strips_extension() {
        let path = std::path::Path::new("/path/to/my_patch.json");
        assert_eq!(graph_name_from_path(path), Some("my_patch".to_string()));
    }
}
