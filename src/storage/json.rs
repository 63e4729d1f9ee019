use super::{Storage, StorageError};
use crate::config::Config;
use crate::models::TodoDocument;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// What to do with a backing document that exists but does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Treat it as an empty document.
    #[default]
    Lenient,
    /// Report it as `StorageError::Corrupt`.
    Strict,
}

impl LoadPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "empty" => Some(LoadPolicy::Lenient),
            "error" => Some(LoadPolicy::Strict),
            _ => None,
        }
    }

    pub fn to_str(self) -> &'static str {
        match self {
            LoadPolicy::Lenient => "empty",
            LoadPolicy::Strict => "error",
        }
    }
}

#[derive(Debug)]
pub struct JsonStorage {
    path: PathBuf,
    policy: LoadPolicy,
}

impl JsonStorage {
    pub fn new(config: &Config) -> Result<Self, StorageError> {
        let path = config
            .storage_path
            .as_deref()
            .ok_or_else(|| StorageError::Storage("Storage path not configured".to_string()))?;
        let path = PathBuf::from(shellexpand::tilde(path).to_string());
        Ok(Self {
            path,
            policy: config.load_policy(),
        })
    }

    pub fn at<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            policy: LoadPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for JsonStorage {
    fn save(&self, data: &TodoDocument) -> Result<(), StorageError> {
        // Create parent directories if they don't exist
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let json = to_indented_json(data)?;

        // Replace the file in one rename so readers never see a half-written document
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        // Keep the mode of the document being replaced
        match std::fs::metadata(&self.path) {
            Ok(metadata) => tmp.as_file().set_permissions(metadata.permissions())?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), lists = data.todo_lists.len(), "saved document");
        Ok(())
    }

    fn load(&self) -> Result<TodoDocument, StorageError> {
        let contents = match std::fs::read(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(TodoDocument::new()),
            Err(e) => return Err(e.into()),
        };
        if contents.iter().all(u8::is_ascii_whitespace) {
            return Ok(TodoDocument::new());
        }

        match serde_json::from_slice::<TodoDocument>(&contents) {
            Ok(data) => Ok(data),
            Err(source) => match self.policy {
                LoadPolicy::Lenient => {
                    warn!(
                        path = %self.path.display(),
                        error = %source,
                        "backing document is malformed, treating it as empty"
                    );
                    Ok(TodoDocument::new())
                }
                LoadPolicy::Strict => Err(StorageError::Corrupt {
                    path: self.path.clone(),
                    source,
                }),
            },
        }
    }
}

fn to_indented_json(data: &TodoDocument) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    data.serialize(&mut serializer)?;
    Ok(out)
}
