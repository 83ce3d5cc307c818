//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "revboard";
const APPLICATION: &str = "revboard";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Default table settings file.
///
/// - Linux: `$XDG_CONFIG_HOME/revboard/table.json` or `~/.config/revboard/table.json`
/// - macOS: `~/Library/Application Support/dev.revboard.revboard/table.json`
pub fn settings_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("table.json"))
}

/// Log file for the current session.
pub fn log_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().join("latest.log"))
}
