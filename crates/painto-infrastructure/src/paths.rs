//! Unified path management for painto configuration and client state.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/painto/            # Config directory
//! ├── config.toml              # Storefront configuration
//! ├── client_state.toml        # Persisted locale preference and cart id
//! ├── locales/                 # Optional local dictionaries
//! │   ├── en/common.json
//! │   └── he/common.json
//! └── logs/                    # Rolling log files
//! ```

use std::path::{Path, PathBuf};

use painto_core::error::{PaintoError, Result};

const APP_DIR: &str = "painto";

/// Resolves storefront paths, optionally under an explicit base directory.
///
/// With a base directory every path is rooted there, which is how tests and
/// the CLI's `--home` flag avoid touching the real user config.
#[derive(Debug, Clone, Default)]
pub struct PaintoPaths {
    base: Option<PathBuf>,
}

impl PaintoPaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// `~/.config/painto` (platform equivalent), or the base directory.
    pub fn config_dir(&self) -> Result<PathBuf> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| PaintoError::config("Cannot find config directory"))
    }

    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn client_state_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("client_state.toml"))
    }

    pub fn locales_dir(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("locales"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_under_base() {
        let paths = PaintoPaths::new(Some(Path::new("/tmp/painto-test")));
        assert_eq!(
            paths.config_file().unwrap(),
            PathBuf::from("/tmp/painto-test/config.toml")
        );
        assert_eq!(
            paths.client_state_file().unwrap(),
            PathBuf::from("/tmp/painto-test/client_state.toml")
        );
        assert_eq!(
            paths.locales_dir().unwrap(),
            PathBuf::from("/tmp/painto-test/locales")
        );
        assert_eq!(paths.logs_dir().unwrap(), PathBuf::from("/tmp/painto-test/logs"));
    }
}
