use crate::error::StateError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

const STATE_FILE_NAME: &str = "state.json";

/// The only piece of renderer state that outlives it: the stored progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    pub progress: i32,
}

impl SavedState {
    /// Read a saved state. A missing file is not an error and yields `None`.
    pub fn load(path: &Path) -> Result<Option<Self>, StateError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Write this state to `path`, creating any missing parent directories.
    pub fn save(&self, path: &Path) -> Result<(), StateError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// The per user location used when no explicit path is given.
    pub fn default_path() -> Option<PathBuf> {
        let dirs = ProjectDirs::from("", "", "circlewave")?;
        Some(dirs.data_dir().join(STATE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join(STATE_FILE_NAME);
        SavedState { progress: 730 }.save(&path).expect("save failed");

        let loaded = SavedState::load(&path).expect("load failed");
        assert_eq!(loaded, Some(SavedState { progress: 730 }));
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let loaded = SavedState::load(&dir.path().join(STATE_FILE_NAME)).expect("load failed");
        assert_eq!(loaded, None);
    }

    #[test]
    fn malformed_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(STATE_FILE_NAME);
        fs::write(&path, "{progress: nope").expect("write failed");
        assert!(matches!(SavedState::load(&path), Err(StateError::Malformed(_))));
    }
}
