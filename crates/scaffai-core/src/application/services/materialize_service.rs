//! Materialize Service - writes an extracted file set to disk.
//!
//! Paths come from model output and are untrusted. Every path is checked
//! before anything is written: absolute paths and `..` components are
//! rejected with [`ApplicationError::UnsafePath`]. The write itself is
//! all-or-nothing; on failure the output root is removed again.

use std::path::{Component, Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::GeneratedFileSet,
    error::ScaffaiResult,
};

/// What was written, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeReport {
    pub root: PathBuf,
    pub files: Vec<PathBuf>,
}

pub struct MaterializeService {
    filesystem: Box<dyn Filesystem>,
}

impl MaterializeService {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Write every file of `files` below `root`.
    ///
    /// # Errors
    ///
    /// - `UnsafePath` if any path is absolute or climbs out of `root`
    /// - `OutputExists` if `root` is already present
    /// - `FilesystemError` for I/O failures, after a best-effort rollback
    #[instrument(skip_all, fields(root = %root.as_ref().display(), files = files.len()))]
    pub fn materialize(
        &self,
        files: &GeneratedFileSet,
        root: impl AsRef<Path>,
    ) -> ScaffaiResult<MaterializeReport> {
        let root = root.as_ref();

        let relative = files
            .paths()
            .map(sanitize)
            .collect::<ScaffaiResult<Vec<_>>>()?;

        if self.filesystem.exists(root) {
            return Err(ApplicationError::OutputExists {
                path: root.to_path_buf(),
            }
            .into());
        }

        match self.write_all(root, files, &relative) {
            Ok(()) => {
                info!("Wrote {} files", relative.len());
                Ok(MaterializeReport {
                    root: root.to_path_buf(),
                    files: relative,
                })
            }
            Err(e) => {
                warn!("Write failed, attempting rollback");
                self.rollback(root);
                Err(e)
            }
        }
    }

    fn write_all(
        &self,
        root: &Path,
        files: &GeneratedFileSet,
        relative: &[PathBuf],
    ) -> ScaffaiResult<()> {
        self.filesystem.create_dir_all(root)?;

        for ((_, content), rel) in files.iter().zip(relative) {
            let path = root.join(rel);
            if let Some(parent) = path.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.write_file(&path, content)?;
        }

        Ok(())
    }

    fn rollback(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(error = %e, path = %root.display(), "Rollback failed");
        } else {
            info!("Rollback successful");
        }
    }
}

/// Normalize a generated path to a relative path below the output root.
fn sanitize(raw: &str) -> ScaffaiResult<PathBuf> {
    let unsafe_path = || ApplicationError::UnsafePath {
        path: raw.to_string(),
    };

    // Windows-style roots are rejected on every platform.
    if raw.starts_with(['/', '\\']) || raw.get(1..2) == Some(":") {
        return Err(unsafe_path().into());
    }

    let mut out = PathBuf::new();
    for component in Path::new(raw).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(unsafe_path().into());
            }
        }
    }

    if out.as_os_str().is_empty() {
        return Err(unsafe_path().into());
    }
    Ok(out)
}
