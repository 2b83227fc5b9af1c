use crate::{ConnectionProfile, DbError};
use std::fs;
use std::path::PathBuf;

/// The application's config directory, created on first use. Shared by every
/// JSON store.
pub(crate) fn app_config_dir() -> Result<PathBuf, DbError> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        DbError::IoError(std::io::Error::other("Could not find config directory"))
    })?;

    let app_dir = config_dir.join("sqlarbor");
    fs::create_dir_all(&app_dir).map_err(DbError::IoError)?;
    Ok(app_dir)
}

/// Persistent storage for connection profiles.
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new() -> Result<Self, DbError> {
        Ok(Self {
            path: app_config_dir()?.join("profiles.json"),
        })
    }

    /// Store at an explicit path, for tests and embedding hosts.
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<Vec<ConnectionProfile>, DbError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(DbError::IoError)?;
        let profiles: Vec<ConnectionProfile> =
            serde_json::from_str(&content).map_err(|e| DbError::InvalidProfile(e.to_string()))?;

        Ok(profiles)
    }

    pub fn save(&self, profiles: &[ConnectionProfile]) -> Result<(), DbError> {
        let content = serde_json::to_string_pretty(profiles)
            .map_err(|e| DbError::InvalidProfile(e.to_string()))?;

        fs::write(&self.path, content).map_err(DbError::IoError)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;

    #[test]
    fn save_then_load_returns_same_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::at_path(dir.path().join("profiles.json"));

        let profiles = vec![
            ConnectionProfile::new("local", DbConfig::default()),
            ConnectionProfile::new("staging", DbConfig::new("10.0.0.5", 3306, "deploy")),
        ];
        store.save(&profiles).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "local");
        assert_eq!(loaded[1].config.host, "10.0.0.5");
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::at_path(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_empty());
    }
}
