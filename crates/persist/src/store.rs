//! File-backed registry persistence.
//!
//! The whole registry lives in one YAML file (`namespace.yaml` by default).
//! It is read once at startup and written once at shutdown; a missing file
//! means first start and yields an empty registry.

use crate::document::RegistryDocument;
use nsreg_kernel::Registry;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Errors from file-backed persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("corrupt registry document: {0}")]
    Corrupt(String),
}

/// File-backed registry store.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    /// Point a store at a document path. Does not touch the filesystem.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the registry. A missing file is an empty registry.
    ///
    /// Only a path with nothing at it counts as missing; a dangling symlink or
    /// any other read failure is an error.
    pub fn load(&self) -> Result<Registry, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound && !self.has_entry() => {
                tracing::info!(
                    path = %self.path.display(),
                    "no registry document, starting empty"
                );
                return Ok(Registry::new());
            }
            Err(e) => return Err(e.into()),
        };
        let registry = RegistryDocument::from_yaml(&text)?.restore()?;
        tracing::info!(
            path = %self.path.display(),
            namespaces = registry.len(),
            "registry loaded"
        );
        Ok(registry)
    }

    /// Write the full registry, replacing the previous document.
    pub fn save(&self, registry: &Registry) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = RegistryDocument::capture(registry).to_yaml()?;
        let tmp = self.temp_path();
        let written = std::fs::write(&tmp, yaml).and_then(|()| std::fs::rename(&tmp, &self.path));
        if let Err(e) = written {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        tracing::info!(
            path = %self.path.display(),
            namespaces = registry.len(),
            "registry saved"
        );
        Ok(())
    }

    /// Whether anything, including a broken symlink, sits at the path.
    fn has_entry(&self) -> bool {
        std::fs::symlink_metadata(&self.path).is_ok()
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
