use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tempfile::NamedTempFile;

use crate::model::task::TaskNode;

/// Error type for reading and writing the task data file
#[derive(Debug, thiserror::Error)]
pub enum StoreIoError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not serialize tasks: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Where the serialized tree lives between runs.
pub trait Persistence {
    /// The last saved blob, or `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<String>, StoreIoError>;
    fn save(&mut self, blob: &str) -> Result<(), StoreIoError>;
}

// ---------------------------------------------------------------------------
// Blob codec
// ---------------------------------------------------------------------------

/// Serialize the root task list.
pub fn encode_tree(tasks: &[TaskNode]) -> Result<String, StoreIoError> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

/// Parse a saved blob. Missing or `null` lists are read as empty at every
/// depth; anything unparsable yields an empty tree.
pub fn decode_tree(blob: &str) -> Vec<TaskNode> {
    match serde_json::from_str::<Vec<TaskNode>>(blob) {
        Ok(mut tasks) => {
            sanitize(&mut tasks);
            tasks
        }
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable task data");
            Vec::new()
        }
    }
}

/// `completed_at` only survives on completed nodes.
fn sanitize(tasks: &mut [TaskNode]) {
    for task in tasks {
        if !task.is_completed {
            task.completed_at = None;
        }
        sanitize(&mut task.subtasks);
    }
}

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

/// Write to a sibling temp file, then rename over `path`.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileBackend { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for JsonFileBackend {
    fn load(&self) -> Result<Option<String>, StoreIoError> {
        match fs::read(&self.path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(content) => Ok(Some(content)),
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "task data is not valid UTF-8, starting empty"
                    );
                    Ok(Some(String::new()))
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreIoError::ReadError {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn save(&mut self, blob: &str) -> Result<(), StoreIoError> {
        atomic_write(&self.path, blob.as_bytes()).map_err(|e| StoreIoError::WriteError {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// In-process backend. Clones share the same slot, so a test can keep one
/// handle and inspect what the store saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        MemoryBackend {
            slot: Rc::new(RefCell::new(Some(blob.into()))),
        }
    }

    /// The most recently saved blob.
    pub fn blob(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl Persistence for MemoryBackend {
    fn load(&self) -> Result<Option<String>, StoreIoError> {
        Ok(self.blob())
    }

    fn save(&mut self, blob: &str) -> Result<(), StoreIoError> {
        *self.slot.borrow_mut() = Some(blob.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_tree() -> Vec<TaskNode> {
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap();
        let mut root = TaskNode::new("r".into(), "Root".into(), vec!["home".into()], now);
        root.description = Some("notes".into());
        let mut child = TaskNode::new_subtask("c".into(), "r", "Child".into(), vec![], now);
        child.is_completed = true;
        child.completed_at = Some(now);
        root.subtasks.push(child);
        vec![root, TaskNode::new("s".into(), "Second".into(), vec![], now)]
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let tree = sample_tree();
        let blob = encode_tree(&tree).unwrap();
        assert_eq!(decode_tree(&blob), tree);
    }

    #[test]
    fn test_decode_fills_missing_subtasks_at_depth() {
        let blob = r#"[
  {"id":"r","title":"Root","tags":[],"isCompleted":false,
   "createdAt":"2025-05-01T12:00:00Z","updatedAt":"2025-05-01T12:00:00Z",
   "subtasks":[
     {"id":"c","parentId":"r","title":"Child","tags":["x"],"isCompleted":false,
      "createdAt":"2025-05-01T12:00:00Z","updatedAt":"2025-05-01T12:00:00Z"}
   ]},
  {"id":"s","title":"Second","subtasks":null,
   "createdAt":"2025-05-01T12:00:00Z","updatedAt":"2025-05-01T12:00:00Z"}
]"#;
        let tree = decode_tree(blob);
        assert_eq!(tree.len(), 2);
        assert!(tree[0].subtasks[0].subtasks.is_empty());
        assert!(tree[1].subtasks.is_empty());
        assert!(tree[1].tags.is_empty());
    }

    #[test]
    fn test_decode_drops_stray_completed_at() {
        let blob = r#"[{"id":"r","title":"Root","isCompleted":false,
            "completedAt":"2025-05-02T00:00:00Z",
            "createdAt":"2025-05-01T12:00:00Z","updatedAt":"2025-05-01T12:00:00Z"}]"#;
        let tree = decode_tree(blob);
        assert_eq!(tree[0].completed_at, None);
    }

    #[test]
    fn test_decode_malformed_is_empty() {
        assert!(decode_tree("not json {{{").is_empty());
        assert!(decode_tree(r#"{"id":"x"}"#).is_empty());
        assert!(decode_tree("").is_empty());
    }

    #[test]
    fn test_file_backend_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("tasks.json"));
        assert_eq!(backend.load().unwrap(), None);
    }

    #[test]
    fn test_file_backend_non_utf8_loads_as_empty_tree() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, [0xff, 0xfe, b'[', b']']).unwrap();
        let backend = JsonFileBackend::new(&path);
        let blob = backend.load().unwrap().unwrap();
        assert!(decode_tree(&blob).is_empty());
    }

    #[test]
    fn test_file_backend_save_creates_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/tasks.json");
        let mut backend = JsonFileBackend::new(&path);
        backend.save("[]").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
        assert_eq!(backend.load().unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_memory_backend_shares_slot() {
        let handle = MemoryBackend::new();
        let mut backend = handle.clone();
        assert_eq!(backend.load().unwrap(), None);
        backend.save("[1]").unwrap();
        assert_eq!(handle.blob().as_deref(), Some("[1]"));
    }
}
