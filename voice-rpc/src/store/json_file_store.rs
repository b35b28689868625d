use super::CredentialStore;
use crate::Result;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CURRENT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone)]
struct StoredCredentials {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default = "current_version")]
    version: u32,
}

impl Default for StoredCredentials {
    fn default() -> Self {
        Self {
            access_token: None,
            version: CURRENT_VERSION,
        }
    }
}

fn current_version() -> u32 {
    CURRENT_VERSION
}

/// Keeps the token in a small JSON document on disk. Writes replace the whole
/// file.
pub struct JsonFileStore {
    path: PathBuf,
    data: RwLock<StoredCredentials>,
}

impl JsonFileStore {
    /// A missing file starts out empty. An unreadable one is logged and
    /// ignored; it is overwritten on the next save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let data = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(data) => data,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Ignoring unreadable credential file");
                    StoredCredentials::default()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No credential file yet");
                StoredCredentials::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, data: &StoredCredentials) -> Result<()> {
        let encoded = serde_json::to_vec_pretty(data)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, encoded)?;
        fs::rename(&tmp, &self.path)?;

        Ok(())
    }
}

impl CredentialStore for JsonFileStore {
    fn access_token(&self) -> Option<String> {
        self.data.read().access_token.clone()
    }

    fn set_access_token(&self, token: Option<String>) -> Result<()> {
        let mut data = self.data.write();
        data.access_token = token;
        data.version = CURRENT_VERSION;
        self.save(&data)
    }
}
