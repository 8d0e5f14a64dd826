use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::persist;

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub project_dir: Option<PathBuf>,
}

/// Directory layout of the remake project the tools read from and write into.
#[derive(Debug, Clone)]
pub struct ProjectDirs {
    pub root: PathBuf,
}

impl ProjectDirs {
    pub fn new(root: PathBuf) -> Self {
        ProjectDirs { root }
    }

    // Raw binary dumps from the game disk.
    pub fn raw(&self) -> PathBuf {
        self.root.join("raw")
    }

    // Decoded dumps and tile sheets.
    pub fn png(&self) -> PathBuf {
        self.root.join("png")
    }

    // Assets consumed by the game build: room backgrounds, sprite sheets, door sheets.
    pub fn content(&self) -> PathBuf {
        self.root.join("Content")
    }

    // Emulator screenshots and diagnostic output.
    pub fn images(&self) -> PathBuf {
        self.root.join("assets").join("images")
    }

    pub fn data(&self) -> PathBuf {
        self.root.join("assets").join("data")
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let project_dirs = directories::ProjectDirs::from("", "", "CpcGfxTools")
        .context("Unable to open global config directory.")?;
    Ok(project_dirs.config_dir().join("config.json"))
}

/// Load the config at `path`; a missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<ToolConfig> {
    if !path.exists() {
        debug!("No config at {}", path.display());
        return Ok(ToolConfig::default());
    }
    persist::load_json(path)
}

/// Pick the project root: explicit flag, then the configured directory, then the
/// current directory.
pub fn resolve_project_dir(flag: Option<&Path>, config: &ToolConfig) -> Result<ProjectDirs> {
    let root = match (flag, &config.project_dir) {
        (Some(dir), _) => dir.to_owned(),
        (None, Some(dir)) => dir.clone(),
        (None, None) => std::env::current_dir().context("Unable to determine current directory.")?,
    };
    Ok(ProjectDirs::new(root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_overrides_config() {
        let config = ToolConfig {
            project_dir: Some(PathBuf::from("/configured")),
        };
        let dirs = resolve_project_dir(Some(Path::new("/flag")), &config).unwrap();
        assert_eq!(dirs.root, PathBuf::from("/flag"));
        let dirs = resolve_project_dir(None, &config).unwrap();
        assert_eq!(dirs.content(), PathBuf::from("/configured/Content"));
        assert_eq!(dirs.data(), PathBuf::from("/configured/assets/data"));
    }

    #[test]
    fn missing_config_is_default() {
        let config = load_config(Path::new("/nonexistent/cpc_gfx_tools/config.json")).unwrap();
        assert_eq!(config, ToolConfig::default());
    }
}
