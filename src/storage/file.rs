//! File-backed document store with atomic replacement.

use crate::error::PersistenceError;
use crate::model::EnterpriseConfigDocument;
use log::{debug, info};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Reads and writes the configuration document at one path.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `document`, replacing any previous file in one rename.
    pub fn write(&self, document: &EnterpriseConfigDocument) -> Result<(), PersistenceError> {
        self.stage(document)?.commit()
    }

    /// Serialize `document` into a temporary file next to the target.
    ///
    /// Nothing at the target path changes until [`StagedDocument::commit`].
    /// Dropping the staged document removes the temporary file.
    pub fn stage(
        &self,
        document: &EnterpriseConfigDocument,
    ) -> Result<StagedDocument, PersistenceError> {
        let fail = |cause: io::Error| PersistenceError::new(&self.path, cause);

        let mut file = tempfile::Builder::new()
            .prefix(".enterprise-config-")
            .suffix(".tmp")
            .tempfile_in(self.directory())
            .map_err(fail)?;

        serde_json::to_writer_pretty(&mut file, document).map_err(|e| fail(e.into()))?;
        file.write_all(b"\n").map_err(fail)?;
        file.as_file().sync_all().map_err(fail)?;

        debug!("Staged configuration document at {}", file.path().display());
        Ok(StagedDocument {
            file,
            target: self.path.clone(),
        })
    }

    pub fn load(&self) -> Result<EnterpriseConfigDocument, PersistenceError> {
        let bytes = fs::read(&self.path).map_err(|e| PersistenceError::new(&self.path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            PersistenceError::new(&self.path, io::Error::new(io::ErrorKind::InvalidData, e))
        })
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

/// A fully written temporary copy awaiting the final rename.
#[derive(Debug)]
pub struct StagedDocument {
    file: NamedTempFile,
    target: PathBuf,
}

impl StagedDocument {
    pub fn temp_path(&self) -> &Path {
        self.file.path()
    }

    /// Atomically move the staged file over the target.
    pub fn commit(self) -> Result<(), PersistenceError> {
        let target = self.target;
        self.file
            .persist(&target)
            .map_err(|e| PersistenceError::new(&target, e.error))?;

        sync_parent_dir(&target).map_err(|e| PersistenceError::new(&target, e))?;

        info!("Configuration document written to {}", target.display());
        Ok(())
    }
}

/// Flush the directory entry so the rename survives a crash.
#[cfg(unix)]
fn sync_parent_dir(target: &Path) -> io::Result<()> {
    match target.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => fs::File::open(parent)?.sync_all(),
        None => Ok(()),
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_target: &Path) -> io::Result<()> {
    Ok(())
}
