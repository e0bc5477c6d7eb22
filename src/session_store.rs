use std::fs;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;

use crate::settings::ApiSettings;
use crate::todo::TodoItem;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// Coarse mtimes miss same-length rewrites, so the contents are hashed too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
    digest: u64,
}

/// The files an agent session shares with the viewer: the todo list it keeps
/// up to date and the settings snapshot of the desktop shell.
///
/// Both files are only ever read here.
#[derive(Debug)]
pub struct SessionStore {
    todos_file: PathBuf,
    settings_file: PathBuf,
    // `None` until the first poll; `Some(None)` while the file is missing.
    todos_seen: Option<Option<FileStamp>>,
    settings_seen: Option<Option<FileStamp>>,
}

impl SessionStore {
    pub fn new(todos_file: impl Into<PathBuf>, settings_file: impl Into<PathBuf>) -> Self {
        Self {
            todos_file: todos_file.into(),
            settings_file: settings_file.into(),
            todos_seen: None,
            settings_seen: None,
        }
    }

    pub fn todos_file(&self) -> &Path {
        &self.todos_file
    }

    pub fn settings_file(&self) -> &Path {
        &self.settings_file
    }

    /// Reads the todo list. A missing file is an empty plan.
    pub fn read_todos(&self) -> Result<Vec<TodoItem>, LoadError> {
        read_todos_file(&self.todos_file)
    }

    pub fn read_settings(&self) -> Option<ApiSettings> {
        ApiSettings::load(&self.settings_file)
    }

    /// Returns a fresh todo list when the file changed since the last poll.
    pub fn poll_todos(&mut self) -> Option<Result<Vec<TodoItem>, LoadError>> {
        let stamp = file_stamp(&self.todos_file);
        if self.todos_seen == Some(stamp) {
            return None;
        }
        self.todos_seen = Some(stamp);
        Some(self.read_todos())
    }

    /// Returns the settings snapshot when the file changed since the last poll.
    pub fn poll_settings(&mut self) -> Option<Option<ApiSettings>> {
        let stamp = file_stamp(&self.settings_file);
        if self.settings_seen == Some(stamp) {
            return None;
        }
        self.settings_seen = Some(stamp);
        Some(self.read_settings())
    }
}

pub fn read_todos_file(path: &Path) -> Result<Vec<TodoItem>, LoadError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(LoadError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str::<Vec<TodoItem>>(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn file_stamp(path: &Path) -> Option<FileStamp> {
    let metadata = fs::metadata(path).ok()?;
    let contents = fs::read(path).ok()?;
    let mut hasher = DefaultHasher::new();
    contents.hash(&mut hasher);
    Some(FileStamp {
        modified: metadata.modified().ok(),
        len: metadata.len(),
        digest: hasher.finish(),
    })
}

#[cfg(test)]
#[path = "../tests/unit/session_store_tests.rs"]
mod tests;
