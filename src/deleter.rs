//! Ways of getting rid of a file. The tree hands over one path at a time and
//! only removes the node when the deleter reports success.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf, Prefix};
use tracing::{debug, trace};

use crate::Error;

pub trait FileDeleter {
    fn delete(&self, path: &Path) -> Result<(), Error>;

    fn name(&self) -> &'static str {
        "custom"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMethod {
    #[default]
    Permanent,
    Trash,
    Backup,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PermanentDeleter;

impl FileDeleter for PermanentDeleter {
    fn delete(&self, path: &Path) -> Result<(), Error> {
        fs::remove_file(path)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "permanent"
    }
}

/// Moves files to the system Recycle Bin / Trash.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrashDeleter;

impl FileDeleter for TrashDeleter {
    fn delete(&self, path: &Path) -> Result<(), Error> {
        trash::delete(path)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "trash"
    }
}

/// Moves files under a backup folder, mirroring their original location.
#[derive(Debug, Clone)]
pub struct BackupDeleter {
    folder: PathBuf,
}

impl BackupDeleter {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Where `path` ends up inside the backup folder.
    pub fn target_for(&self, path: &Path) -> PathBuf {
        self.folder.join(relative_to_root(path))
    }
}

impl FileDeleter for BackupDeleter {
    fn delete(&self, path: &Path) -> Result<(), Error> {
        let target = self.target_for(path);
        if target.exists() {
            return Err(Error::Other(format!(
                "backup target '{}' already exists",
                target.display()
            )));
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        if let Err(err) = fs::rename(path, &target) {
            // rename fails across filesystems
            debug!("Rename of '{}' failed ({}), copying instead", path.display(), err);
            fs::copy(path, &target)?;
            fs::remove_file(path)?;
        }
        trace!("Backed up '{}' to '{}'", path.display(), target.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "backup"
    }
}

/// Strip the root of a path, keeping a drive letter as a plain directory.
fn relative_to_root(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => {
                if let Prefix::Disk(letter) | Prefix::VerbatimDisk(letter) = prefix.kind() {
                    result.push((letter as char).to_string());
                }
            }
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(part) => result.push(part),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_relative_to_root() {
        assert_eq!(
            relative_to_root(Path::new("/home/user/a.txt")),
            PathBuf::from("home/user/a.txt")
        );
        assert_eq!(
            relative_to_root(Path::new("/home/user/../b.txt")),
            PathBuf::from("home/b.txt")
        );
    }

    #[test]
    fn test_permanent_deleter_removes_file() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("gone.txt");
        fs::write(&file, "bye").unwrap();

        PermanentDeleter.delete(&file).unwrap();
        assert!(!file.exists());
        assert!(matches!(PermanentDeleter.delete(&file), Err(Error::Io(_))));
    }

    #[test]
    fn test_backup_deleter_mirrors_path() {
        let tmp = tempdir().unwrap();
        let source_dir = tmp.path().join("source");
        fs::create_dir_all(&source_dir).unwrap();
        let file = source_dir.join("photo.jpg");
        fs::write(&file, "pixels").unwrap();

        let backup = BackupDeleter::new(tmp.path().join("backup"));
        let target = backup.target_for(&file);
        backup.delete(&file).unwrap();

        assert!(!file.exists());
        assert_eq!(fs::read_to_string(&target).unwrap(), "pixels");
        assert!(target.starts_with(backup.folder()));
    }

    #[test]
    fn test_backup_deleter_refuses_to_overwrite() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("twin.txt");
        fs::write(&file, "one").unwrap();

        let backup = BackupDeleter::new(tmp.path().join("backup"));
        let target = backup.target_for(&file);
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, "already here").unwrap();

        assert!(backup.delete(&file).is_err());
        assert!(file.exists());
    }
}
