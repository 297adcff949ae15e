//! Common test utilities for the larc integration suite.

// Allow dead code because these utilities are shared across test files and
// not every test file uses all of them
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use tempfile::TempDir;

/// A temporary directory of resource files for file-backed tests.
///
/// The directory is removed when the value drops.
pub struct TestFiles {
    dir: TempDir,
}

impl TestFiles {
    /// Creates an empty temporary resource directory.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("Failed to create temporary directory")?;
        Ok(Self { dir })
    }

    /// Root of the resource directory.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Writes a file under the root, creating parent directories as needed.
    pub fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}
