//! Where the console keeps its settings file.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "podly-console";
const SETTINGS_FILE: &str = "settings.toml";

/// Locations of the console's local files.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub settings_file: PathBuf,
}

impl AppPaths {
    /// Rooted at `dirs::config_dir()`, or the working directory on platforms
    /// without one.
    pub fn new() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::under(&base)
    }

    pub fn under(base: &Path) -> Self {
        let config_dir = base.join(APP_DIR);
        Self {
            settings_file: config_dir.join(SETTINGS_FILE),
            config_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_file_lives_in_app_dir() {
        let paths = AppPaths::under(Path::new("/home/ann/.config"));
        assert_eq!(paths.config_dir, Path::new("/home/ann/.config/podly-console"));
        assert_eq!(
            paths.settings_file,
            Path::new("/home/ann/.config/podly-console/settings.toml")
        );
    }

    #[test]
    fn platform_paths_resolve() {
        let paths = AppPaths::new();
        assert!(paths.settings_file.starts_with(&paths.config_dir));
    }
}
