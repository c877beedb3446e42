//! File-backed cache for the current tip and the daemon's pid.
//!
//! Both files are rewritten whole.  Writes go to a sibling temp file and are
//! renamed into place, so a concurrent reader sees either the old or the new
//! content.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use tipline_config::DEFAULT_TIP;

pub const CACHE_FILE_NAME: &str = "current_reminder.txt";
pub const PID_FILE_NAME: &str = "daemon.pid";
pub const LOG_FILE_NAME: &str = "daemon.log";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot create cache directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot remove {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
    default_tip: String,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            default_tip: DEFAULT_TIP.to_string(),
        }
    }

    pub fn with_default_tip(mut self, tip: impl Into<String>) -> Self {
        self.default_tip = tip.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn cache_file(&self) -> PathBuf {
        self.dir.join(CACHE_FILE_NAME)
    }

    pub fn pid_file(&self) -> PathBuf {
        self.dir.join(PID_FILE_NAME)
    }

    pub fn log_file(&self) -> PathBuf {
        self.dir.join(LOG_FILE_NAME)
    }

    /// Create the cache directory and its parents.  Idempotent.
    pub fn ensure_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::CreateDir {
            path: self.dir.clone(),
            source,
        })
    }

    pub fn write(&self, text: &str) -> Result<(), StoreError> {
        self.ensure_dir()?;
        write_atomic(&self.cache_file(), text)
    }

    /// Current tip trimmed of surrounding whitespace, or the default tip when
    /// nothing has been written yet.
    pub fn read(&self) -> Result<String, StoreError> {
        self.ensure_dir()?;
        match read_optional(&self.cache_file())? {
            Some(text) => Ok(text.trim().to_string()),
            None => Ok(self.default_tip.clone()),
        }
    }

    pub fn write_handle(&self, pid: u32) -> Result<(), StoreError> {
        self.ensure_dir()?;
        write_atomic(&self.pid_file(), &pid.to_string())
    }

    /// Recorded daemon pid.  Missing or unparsable content is `None`.
    pub fn read_handle(&self) -> Result<Option<u32>, StoreError> {
        let Some(raw) = read_optional(&self.pid_file())? else {
            return Ok(None);
        };
        let pid = raw.trim().parse::<u32>().ok();
        if pid.is_none() {
            debug!(path = %self.pid_file().display(), "ignoring unparsable pid file");
        }
        Ok(pid)
    }

    /// Remove the pid file.  An already-absent file is not an error.
    pub fn clear_handle(&self) -> Result<(), StoreError> {
        let path = self.pid_file();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Remove { path, source }),
        }
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), StoreError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{file_name}.{}.tmp", std::process::id()));

    let result = fs::write(&tmp, contents).and_then(|()| fs::rename(&tmp, path));
    result.map_err(|source| {
        let _ = fs::remove_file(&tmp);
        StoreError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}
