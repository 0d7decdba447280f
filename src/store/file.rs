use super::KeyValueStore;
use crate::error::AppError;
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A directory where each key is a file and the file contents are the value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`. The directory does not have to exist yet;
    /// every key simply reads as missing until it does.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        if dir.exists() && !dir.is_dir() {
            return Err(AppError::StoreError(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        Ok(FileStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`, or `None` for keys that would escape the directory.
    pub fn path_for(&self, key: &str) -> Option<PathBuf> {
        let escapes = key.is_empty()
            || key == "."
            || key == ".."
            || key.contains(['/', '\\']);
        if escapes {
            None
        } else {
            Some(self.dir.join(key))
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let Some(path) = self.path_for(key) else {
            debug!("Ignoring unusable store key {:?}", key);
            return None;
        };

        match fs::read_to_string(&path) {
            Ok(mut content) => {
                // Values written by hand usually end with a newline.
                if content.ends_with('\n') {
                    content.pop();
                    if content.ends_with('\r') {
                        content.pop();
                    }
                }
                Some(content)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                debug!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }
}
