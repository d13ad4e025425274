use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::PathBuf;

use crate::deleter::{BackupDeleter, DeleteMethod, FileDeleter, PermanentDeleter, TrashDeleter};
use crate::model::Mode;
use crate::smart_select::SmartSelectPolicy;
use crate::Error;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mode: Mode,
    pub delete_method: DeleteMethod,
    pub backup_folder: Option<PathBuf>,
    pub default_policy: SmartSelectPolicy,
    /// Filter directive, e.g. `info` or `dupe_tree=debug`.
    pub log_level: String,
    /// Plain-text log copy; none disables file logging.
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Normal,
            delete_method: DeleteMethod::Permanent,
            backup_folder: None,
            default_policy: SmartSelectPolicy::KeepFirstInGroup,
            log_level: "info".to_string(),
            log_file: Some(PathBuf::from("logs/dupe-tree.log")),
        }
    }
}

/// Read `Config.toml` (optional) and `DUPE_TREE_*` environment overrides.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("DUPE_TREE"))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

impl AppConfig {
    /// The deleter configured by `delete_method`.
    pub fn deleter(&self) -> Result<Box<dyn FileDeleter>, Error> {
        match self.delete_method {
            DeleteMethod::Permanent => Ok(Box::new(PermanentDeleter)),
            DeleteMethod::Trash => Ok(Box::new(TrashDeleter)),
            DeleteMethod::Backup => {
                let folder = self.backup_folder.clone().ok_or_else(|| {
                    Error::Other("delete_method 'backup' requires backup_folder".to_string())
                })?;
                Ok(Box::new(BackupDeleter::new(folder)))
            }
        }
    }
}
