use std::path::{Path, PathBuf};

use crate::scope::Scope;

/// Resolves the base directory for a scope.
///
/// The store never touches process-wide directory lookups directly; it asks
/// its resolver. `None` means the directory is unavailable on this host.
pub trait BaseDirs {
    fn base_dir(&self, scope: Scope) -> Option<PathBuf>;
}

impl<T: BaseDirs + ?Sized> BaseDirs for &T {
    fn base_dir(&self, scope: Scope) -> Option<PathBuf> {
        (**self).base_dir(scope)
    }
}

/// The host's per-user cache and documents directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDirs;

impl BaseDirs for SystemDirs {
    fn base_dir(&self, scope: Scope) -> Option<PathBuf> {
        match scope {
            Scope::Cache => dirs::cache_dir(),
            Scope::Documents => dirs::document_dir(),
        }
    }
}

/// Explicit roots for both scopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedDirs {
    pub cache: PathBuf,
    pub documents: PathBuf,
}

impl FixedDirs {
    pub fn new(cache: impl Into<PathBuf>, documents: impl Into<PathBuf>) -> Self {
        Self {
            cache: cache.into(),
            documents: documents.into(),
        }
    }

    /// `<root>/cache` and `<root>/documents`.
    pub fn under(root: &Path) -> Self {
        Self::new(root.join("cache"), root.join("documents"))
    }
}

impl BaseDirs for FixedDirs {
    fn base_dir(&self, scope: Scope) -> Option<PathBuf> {
        match scope {
            Scope::Cache => Some(self.cache.clone()),
            Scope::Documents => Some(self.documents.clone()),
        }
    }
}

/// Per-scope overrides, falling back to [`SystemDirs`] for scopes left unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayeredDirs {
    pub cache: Option<PathBuf>,
    pub documents: Option<PathBuf>,
}

impl BaseDirs for LayeredDirs {
    fn base_dir(&self, scope: Scope) -> Option<PathBuf> {
        let override_dir = match scope {
            Scope::Cache => &self.cache,
            Scope::Documents => &self.documents,
        };
        override_dir.clone().or_else(|| SystemDirs.base_dir(scope))
    }
}
