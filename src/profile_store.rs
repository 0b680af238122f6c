use crate::models::UserRecord;
use log::{debug, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// on-disk copy of the signed-in user, reloaded across runs
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// cached profile if present and readable; a corrupt file is logged and
    /// treated as absent rather than failing startup
    pub fn load(&self) -> Option<UserRecord> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read profile file {}: {}", self.path.display(), e);
                return None;
            }
        };
        match serde_json::from_str::<UserRecord>(&raw) {
            Ok(user) => {
                debug!("Loaded cached profile for user {}", user.id);
                Some(user)
            }
            Err(e) => {
                warn!(
                    "Ignoring unreadable profile file {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    pub fn save(&self, user: &UserRecord) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(user)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, raw)?;
        debug!("Saved profile for user {} to {}", user.id, self.path.display());
        Ok(())
    }

    /// removes the cached profile; already-absent is not an error
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
