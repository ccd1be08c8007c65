//! User registry persisted as a single JSON document.
//!
//! File format:
//!
//! ```json
//! {
//!   "schema_version": 1,
//!   "users": [
//!     { "subject_id": "u123", "created_at": "2024-01-01T00:00:00Z" }
//!   ]
//! }
//! ```
//!
//! Writes go to a sibling temporary file that is then renamed over the
//! registry, so readers never observe a half-written document.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mpauth_application::ports::{RegistryError, UserRegistry};
use mpauth_domain::{SubjectId, UserRow};
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

/// Current version of the registry file format.
pub const REGISTRY_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct RegistryFile {
    schema_version: u32,
    #[serde(default)]
    users: Vec<UserRow>,
}

impl Default for RegistryFile {
    fn default() -> Self {
        Self {
            schema_version: REGISTRY_SCHEMA_VERSION,
            users: Vec::new(),
        }
    }
}

/// Registry backed by a JSON file on disk.
///
/// A missing file reads as an empty registry and is created on first insert.
/// Inserts are serialized through an internal lock; the file is re-read on
/// every call so external edits are picked up.
#[derive(Debug)]
pub struct JsonFileUserRegistry {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileUserRegistry {
    /// Creates a registry stored at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the registry file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<RegistryFile, RegistryError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(RegistryFile::default());
            }
            Err(e) => return Err(RegistryError::Io(e)),
        };

        let file: RegistryFile = serde_json::from_str(&content)
            .map_err(|e| RegistryError::Serialization(e.to_string()))?;

        if file.schema_version > REGISTRY_SCHEMA_VERSION {
            return Err(RegistryError::Serialization(format!(
                "unsupported schema version {} (expected <= {REGISTRY_SCHEMA_VERSION})",
                file.schema_version
            )));
        }

        Ok(file)
    }

    async fn store(&self, file: &RegistryFile) -> Result<(), RegistryError> {
        let json = to_json_stable(file)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json.as_bytes()).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// Serializes with 2-space indentation and a trailing newline.
fn to_json_stable<T: Serialize>(value: &T) -> Result<String, RegistryError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| RegistryError::Serialization(e.to_string()))?;

    let mut json =
        String::from_utf8(buffer).map_err(|e| RegistryError::Serialization(e.to_string()))?;
    json.push('\n');
    Ok(json)
}

#[async_trait]
impl UserRegistry for JsonFileUserRegistry {
    async fn find_by_subject_id(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Vec<UserRow>, RegistryError> {
        let file = self.load().await?;
        Ok(file
            .users
            .into_iter()
            .filter(|row| &row.subject_id == subject_id)
            .collect())
    }

    async fn insert(&self, row: &UserRow) -> Result<(), RegistryError> {
        let _guard = self.write_lock.lock().await;

        let mut file = self.load().await?;
        file.schema_version = REGISTRY_SCHEMA_VERSION;
        file.users.push(row.clone());
        self.store(&file).await?;

        debug!(
            path = %self.path.display(),
            subject_id = %row.subject_id,
            users = file.users.len(),
            "registry row appended"
        );
        Ok(())
    }
}
