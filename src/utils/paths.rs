use std::{
    env, fs,
    path::{Path, PathBuf},
};

use dirs::home_dir;

use crate::errors::Result;

const DEFAULT_DIR_NAME: &str = ".propflow";
const HOME_ENV: &str = "PROPFLOW_HOME";
const CONFIG_FILE: &str = "config.json";
const LOCAL_STORAGE_FILE: &str = "local_storage.json";
const REPORTS_DIR: &str = "reports";

/// Resolves every on-disk location relative to one application root.
pub struct PathResolver;

impl PathResolver {
    /// `PROPFLOW_HOME` when set, otherwise `~/.propflow`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
        root.unwrap_or_else(Self::base_dir)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }

    pub fn local_storage_file_in(base: &Path) -> PathBuf {
        base.join(LOCAL_STORAGE_FILE)
    }

    pub fn reports_dir_in(base: &Path) -> PathBuf {
        base.join(REPORTS_DIR)
    }
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Sibling path used to stage a write before it replaces `path`.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.tmp"),
        None => "tmp".to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes `data` next to `path` and renames it into place.
pub fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn tmp_path_keeps_original_extension() {
        let tmp = tmp_path(Path::new("/data/local_storage.json"));
        assert_eq!(tmp, PathBuf::from("/data/local_storage.json.tmp"));
    }

    #[test]
    fn write_atomic_creates_parent_directories() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("nested").join("state.json");
        write_atomic(&target, "{}").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "{}");
        assert!(!tmp_path(&target).exists());
    }
}
