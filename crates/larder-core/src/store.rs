use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::codec::{self, Dictionary};
use crate::error::{Error, Result};
use crate::path::{can_write_to_disk, data_root, kind_dir, resource_path};
use crate::resolver::{BaseDirs, SystemDirs};
use crate::scope::{ContentKind, Scope};

/// Prefix of the scratch files used while a write is in flight. They live
/// next to their target and are never reported by [`LocalStore::list`].
const TEMP_PREFIX: &str = ".larder-tmp-";

/// What a save call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// A file was already present and overwriting was not allowed.
    SkippedExisting,
}

/// Stores dictionaries, blobs and text under `<base>/Data/<kind>/<name>`.
///
/// Every call is synchronous. There is no locking: two writers racing on the
/// same name both succeed and the last rename wins. Each individual write is
/// committed by renaming a fully written temporary file, so readers never
/// observe a partial payload.
///
/// New files get the same permissions a plain `File::create` would give
/// them (`0o666` less the process umask on Unix).
#[derive(Debug, Clone, Default)]
pub struct LocalStore<D = SystemDirs> {
    dirs: D,
}

impl LocalStore<SystemDirs> {
    /// A store rooted in the host's cache and documents directories.
    pub fn system() -> Self {
        Self::new(SystemDirs)
    }
}

impl<D: BaseDirs> LocalStore<D> {
    pub fn new(dirs: D) -> Self {
        Self { dirs }
    }

    pub fn dirs(&self) -> &D {
        &self.dirs
    }

    fn base_dir(&self, scope: Scope) -> Result<PathBuf> {
        self.dirs
            .base_dir(scope)
            .ok_or(Error::BaseDirUnavailable { scope })
    }

    /// Where `name` of `kind` lives in `scope`, whether or not it exists.
    pub fn resource_path(&self, name: &str, scope: Scope, kind: ContentKind) -> Result<PathBuf> {
        let path = resource_path(&self.base_dir(scope)?, kind, name);
        log::trace!("resolved {kind} '{name}' in {scope} to {path:?}");
        Ok(path)
    }

    /// The resource's path if a file is present there.
    pub fn fetch_path_of(&self, name: &str, scope: Scope, kind: ContentKind) -> Option<PathBuf> {
        let path = self.resource_path(name, scope, kind).ok()?;
        path.is_file().then_some(path)
    }

    // ── Saving ──────────────────────────────────────────────────────────

    pub fn save_dictionary(
        &self,
        dict: &Dictionary,
        scope: Scope,
        name: &str,
        overwrite: bool,
    ) -> Result<WriteOutcome> {
        let kind = ContentKind::Dictionary;
        let bytes = codec::encode_dictionary(dict).map_err(|e| Error::Encode {
            kind,
            message: e.to_string(),
        })?;
        self.save_bytes(&bytes, scope, name, kind, overwrite)
    }

    /// Stores `data` unchanged.
    pub fn save_generic(
        &self,
        data: &[u8],
        scope: Scope,
        name: &str,
        overwrite: bool,
    ) -> Result<WriteOutcome> {
        self.save_bytes(data, scope, name, ContentKind::Generic, overwrite)
    }

    pub fn save_text(
        &self,
        text: &str,
        scope: Scope,
        name: &str,
        overwrite: bool,
    ) -> Result<WriteOutcome> {
        let kind = ContentKind::Text;
        let bytes = codec::encode_text(text).map_err(|e| Error::Encode {
            kind,
            message: e.to_string(),
        })?;
        self.save_bytes(&bytes, scope, name, kind, overwrite)
    }

    fn save_bytes(
        &self,
        bytes: &[u8],
        scope: Scope,
        name: &str,
        kind: ContentKind,
        overwrite: bool,
    ) -> Result<WriteOutcome> {
        let path = self.resource_path(name, scope, kind)?;

        if !can_write_to_disk(overwrite, path.is_file()) {
            log::debug!("not overwriting existing {kind} '{name}' in {scope}");
            return Ok(WriteOutcome::SkippedExisting);
        }

        match write_atomic(&path, bytes) {
            Ok(()) => Ok(WriteOutcome::Written),
            Err(source) => {
                log::error!("failed to write {kind} '{name}' to {path:?}: {source}");
                Err(Error::Write { path, source })
            }
        }
    }

    // ── Loading ─────────────────────────────────────────────────────────
    //
    // Absent resources load as `Ok(None)`. Read and decode failures are
    // reported the same way for every kind.

    pub fn load_dictionary(&self, name: &str, scope: Scope) -> Result<Option<Dictionary>> {
        let kind = ContentKind::Dictionary;
        let Some((path, bytes)) = self.read_bytes(name, scope, kind)? else {
            return Ok(None);
        };
        codec::decode_dictionary(&bytes)
            .map(Some)
            .map_err(|e| Error::Decode {
                path,
                kind,
                message: e.to_string(),
            })
    }

    pub fn load_generic(&self, name: &str, scope: Scope) -> Result<Option<Vec<u8>>> {
        Ok(self
            .read_bytes(name, scope, ContentKind::Generic)?
            .map(|(_, bytes)| bytes))
    }

    pub fn load_text(&self, name: &str, scope: Scope) -> Result<Option<String>> {
        let kind = ContentKind::Text;
        let Some((path, bytes)) = self.read_bytes(name, scope, kind)? else {
            return Ok(None);
        };
        codec::decode_text(&bytes)
            .map(Some)
            .map_err(|e| Error::Decode {
                path,
                kind,
                message: e.to_string(),
            })
    }

    /// Callback form of [`LocalStore::load_dictionary`]. `on_result` runs
    /// once, on this thread, before this call returns.
    pub fn load_dictionary_with<F>(&self, name: &str, scope: Scope, on_result: F)
    where
        F: FnOnce(Result<Option<Dictionary>>),
    {
        on_result(self.load_dictionary(name, scope));
    }

    /// Callback form of [`LocalStore::load_generic`].
    pub fn load_generic_with<F>(&self, name: &str, scope: Scope, on_result: F)
    where
        F: FnOnce(Result<Option<Vec<u8>>>),
    {
        on_result(self.load_generic(name, scope));
    }

    /// Callback form of [`LocalStore::load_text`].
    pub fn load_text_with<F>(&self, name: &str, scope: Scope, on_result: F)
    where
        F: FnOnce(Result<Option<String>>),
    {
        on_result(self.load_text(name, scope));
    }

    fn read_bytes(
        &self,
        name: &str,
        scope: Scope,
        kind: ContentKind,
    ) -> Result<Option<(PathBuf, Vec<u8>)>> {
        let path = self.resource_path(name, scope, kind)?;
        if !path.is_file() {
            return Ok(None);
        }
        match fs::read(&path) {
            Ok(bytes) => Ok(Some((path, bytes))),
            // Removed between the probe and the read.
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(Error::Read { path, source }),
        }
    }

    // ── Removing ────────────────────────────────────────────────────────

    /// Deletes the resource if present. Failures are ignored.
    pub fn remove_resource(&self, name: &str, scope: Scope, kind: ContentKind) {
        let Some(path) = self.fetch_path_of(name, scope, kind) else {
            return;
        };
        if let Err(e) = fs::remove_file(&path) {
            log::debug!("ignoring failure to remove {path:?}: {e}");
        }
    }

    /// Deletes `<base>/Data` for `scope`, taking every kind with it.
    /// Failures are ignored.
    pub fn remove_all_items(&self, scope: Scope) {
        let Some(base) = self.dirs.base_dir(scope) else {
            return;
        };
        let root = data_root(&base);
        if let Err(e) = fs::remove_dir_all(&root) {
            log::debug!("ignoring failure to remove {root:?}: {e}");
        }
    }

    // ── Listing ─────────────────────────────────────────────────────────

    /// Names of the stored `kind` resources in `scope`, sorted.
    pub fn list(&self, scope: Scope, kind: ContentKind) -> Result<Vec<String>> {
        let dir = kind_dir(&self.base_dir(scope)?, kind);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(Error::Read { path: dir, source }),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| Error::Read {
                path: dir.clone(),
                source,
            })?;
            if !entry.file_type().is_ok_and(|t| t.is_file()) {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !name.starts_with(TEMP_PREFIX) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Writes through a temporary file in the target directory, then renames it
/// into place. Missing parent directories are created.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = path.parent().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "resource path has no parent")
    })?;
    fs::create_dir_all(dir)?;

    let mut builder = tempfile::Builder::new();
    builder.prefix(TEMP_PREFIX);
    // tempfile defaults to owner-only; the umask still applies to this mode.
    #[cfg(unix)]
    builder.permissions(std::os::unix::fs::PermissionsExt::from_mode(0o666));
    let mut tmp = builder.tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
