//! Mock system implementation for testing

use super::System;
use std::collections::{HashMap, HashSet};
use std::env::VarError;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// In-memory implementation of System trait for testing
///
/// `MockSystem` provides an in-memory filesystem and environment for fast,
/// isolated tests that never touch the process environment.
///
/// # Example
/// ```
/// use boca::system::{mock::MockSystem, System};
/// use std::path::Path;
///
/// let system = MockSystem::new()
///     .with_env("BOCA_CUSTOM_COMMANDS", "/project/boca.yaml")
///     .with_file("/project/boca.yaml", b"# nothing here yet\n");
///
/// assert_eq!(system.env_var("BOCA_CUSTOM_COMMANDS").unwrap(), "/project/boca.yaml");
/// assert!(system.is_file(Path::new("/project/boca.yaml")));
/// assert!(system.is_dir(Path::new("/project")));
/// ```
#[derive(Clone)]
pub struct MockSystem {
    state: Arc<RwLock<MockSystemState>>,
}

struct MockSystemState {
    env_vars: HashMap<String, String>,
    current_dir: PathBuf,
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: HashSet<PathBuf>,
}

impl MockSystem {
    /// Create a new `MockSystem` with default state
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockSystemState {
                env_vars: HashMap::new(),
                current_dir: PathBuf::from("/"),
                files: HashMap::new(),
                dirs: HashSet::from([PathBuf::from("/")]),
            })),
        }
    }

    /// Set an environment variable (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_env(self, key: &str, value: &str) -> Self {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .env_vars
            .insert(key.to_owned(), value.to_owned());
        self
    }

    /// Set the current working directory (builder pattern)
    ///
    /// The directory is created if it does not exist yet.
    #[must_use]
    #[inline]
    pub fn with_current_dir<P: AsRef<Path>>(self, dir: P) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        Self::ensure_parent_dirs(&mut state.dirs, &dir);
        state.current_dir = dir;
        drop(state);
        self
    }

    /// Add a file with contents (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_file<P: AsRef<Path>>(self, path: P, contents: &[u8]) -> Self {
        let path_buf = path.as_ref().to_path_buf();
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = path_buf.parent() {
            Self::ensure_parent_dirs(&mut state.dirs, parent);
        }

        state.files.insert(path_buf, contents.to_vec());
        drop(state);
        self
    }

    /// Add a directory (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_dir<P: AsRef<Path>>(self, path: P) -> Self {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        Self::ensure_parent_dirs(&mut state.dirs, path.as_ref());
        drop(state);
        self
    }

    /// Raw contents of a file, if present
    #[must_use]
    #[inline]
    pub fn file_contents<P: AsRef<Path>>(&self, path: P) -> Option<Vec<u8>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .files
            .get(path.as_ref())
            .cloned()
    }

    #[inline]
    fn ensure_parent_dirs(dirs: &mut HashSet<PathBuf>, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
    }
}

impl Default for MockSystem {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl System for MockSystem {
    #[inline]
    fn env_var(&self, key: &str) -> Result<String, VarError> {
        let state = self.state.read().map_err(|_| VarError::NotPresent)?;
        state.env_vars.get(key).cloned().ok_or(VarError::NotPresent)
    }

    #[inline]
    fn current_dir(&self) -> io::Result<PathBuf> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        Ok(state.current_dir.clone())
    }

    #[inline]
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        let bytes = state.files.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )
        })?;
        let result = bytes.clone();
        drop(state);
        String::from_utf8(result)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {e}")))
    }

    #[inline]
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !state.dirs.contains(parent)
        {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Parent directory does not exist: {}", parent.display()),
            ));
        }

        state.files.insert(path.to_path_buf(), contents.to_vec());
        drop(state);
        Ok(())
    }

    #[inline]
    fn exists(&self, path: &Path) -> bool {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.files.contains_key(path) || state.dirs.contains(path)
    }

    #[inline]
    fn is_file(&self, path: &Path) -> bool {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.files.contains_key(path)
    }

    #[inline]
    fn is_dir(&self, path: &Path) -> bool {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.dirs.contains(path)
    }
}
