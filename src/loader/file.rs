//! Filesystem-backed resource loading.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use tracing::trace;

use super::{LoadError, ResourceLoader};

/// Loads resources from the filesystem.
///
/// Accepts bare paths as well as `file:` and `file://` locations. Before
/// opening, `~` and environment variable references (`$VAR`, `${VAR}`) are
/// expanded, so locations configured in data files can stay portable across
/// machines. Relative paths resolve against the configured base directory
/// when one is set, otherwise against the process working directory.
///
/// # Examples
///
/// ```rust,no_run
/// use larc::loader::{FileLoader, ResourceLoader};
///
/// let loader = FileLoader::new().with_base_dir("/opt/models");
/// let stream = loader.open("en/tagger.bin").unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileLoader {
    base_dir: Option<PathBuf>,
}

impl FileLoader {
    /// Creates a loader resolving relative paths against the working
    /// directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative locations against `dir` instead of the working
    /// directory.
    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Strips the `file:` scheme and expands `~` and environment variables.
    fn resolve_path(&self, location: &str) -> Result<PathBuf, LoadError> {
        let raw = location
            .strip_prefix("file://")
            .or_else(|| location.strip_prefix("file:"))
            .unwrap_or(location);

        let expanded = shellexpand::full(raw).map_err(LoadError::other)?;
        let mut path = PathBuf::from(expanded.as_ref());

        if path.is_relative()
            && let Some(base) = &self.base_dir
        {
            path = base.join(path);
        }
        Ok(path)
    }
}

impl ResourceLoader for FileLoader {
    fn open(&self, location: &str) -> Result<Box<dyn Read + Send>, LoadError> {
        let path = self.resolve_path(location)?;
        trace!(location, path = %path.display(), "opening file");

        match File::open(&path) {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(LoadError::not_found(location))
            }
            Err(e) => Err(LoadError::Io(std::io::Error::new(
                e.kind(),
                format!("Unable to open [{location}]: {e}"),
            ))),
        }
    }
}
