pub mod documents;

use std::path::{Path, PathBuf};

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid school identifier: {0}")]
    InvalidSchool(String),
    #[error("School not found: {0}")]
    SchoolNotFound(String),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Expected a JSON array in {0}")]
    NotACollection(PathBuf),
}

/// Collections stored per school, one JSON array file each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Classes,
    Children,
    Parents,
    Staff,
    Reports,
}

impl Collection {
    pub fn file_name(self) -> &'static str {
        match self {
            Collection::Classes => "classes.json",
            Collection::Children => "children.json",
            Collection::Parents => "parents.json",
            Collection::Staff => "staff.json",
            Collection::Reports => "reports.json",
        }
    }
}

/// Validates that a school id only contains lowercase ASCII letters, digits and hyphens,
/// does not start or end with a hyphen, and is between 2 and 63 characters.
/// The id becomes a directory name, so nothing else may get through.
pub fn is_valid_school_id(s: &str) -> bool {
    let len = s.len();
    (2..=63).contains(&len)
        && s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !s.starts_with('-')
        && !s.ends_with('-')
}

/// Read-only document snapshot laid out as `<root>/<school-id>/<collection>.json`.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn school_dir(&self, school_id: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_school_id(school_id) {
            return Err(StoreError::InvalidSchool(school_id.to_string()));
        }
        Ok(self.root.join(school_id))
    }

    pub async fn school_exists(&self, school_id: &str) -> Result<bool, StoreError> {
        let dir = self.school_dir(school_id)?;
        Ok(tokio::fs::metadata(&dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    /// The school's own document (`school.json`). Schools without one are
    /// still valid; the caller falls back to the id as the name.
    pub async fn read_school(&self, school_id: &str) -> Result<Option<Value>, StoreError> {
        if !self.school_exists(school_id).await? {
            return Err(StoreError::SchoolNotFound(school_id.to_string()));
        }
        let path = self.school_dir(school_id)?.join("school.json");
        read_json(&path).await
    }

    /// All raw documents of one collection. A missing file is an empty collection.
    pub async fn read_collection(
        &self,
        school_id: &str,
        collection: Collection,
    ) -> Result<Vec<Value>, StoreError> {
        let path = self.school_dir(school_id)?.join(collection.file_name());
        match read_json(&path).await? {
            None => Ok(Vec::new()),
            Some(Value::Array(docs)) => Ok(docs),
            Some(_) => Err(StoreError::NotACollection(path)),
        }
    }
}

async fn read_json(path: &Path) -> Result<Option<Value>, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })
}
