use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

pub const HOME_ENV: &str = "READALONG_HOME";
const DEFAULT_DIR: &str = ".readalong";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_root: PathBuf,
}

impl AppConfig {
    pub fn from_override(path: Option<PathBuf>) -> Result<Self> {
        let root = match path {
            Some(custom) => canonicalize_dir(&custom)?,
            None => default_data_root()?,
        };
        Ok(Self { data_root: root })
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_root.join(SETTINGS_FILE)
    }
}

fn canonicalize_dir(path: &Path) -> Result<PathBuf> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("failed to resolve data directory at {:?}", path))?;
    if canonical.is_dir() {
        Ok(canonical)
    } else {
        Err(anyhow!("data path {:?} is not a directory", canonical))
    }
}

fn default_data_root() -> Result<PathBuf> {
    let root = match std::env::var_os(HOME_ENV) {
        Some(home) => PathBuf::from(home),
        None => std::env::current_dir()
            .context("unable to resolve current directory")?
            .join(DEFAULT_DIR),
    };
    std::fs::create_dir_all(&root)
        .with_context(|| format!("failed to create data directory {:?}", root))?;
    canonicalize_dir(&root)
}
