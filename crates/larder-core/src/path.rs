//! Pure path-building helpers.
//!
//! Layout on disk: `<base>/Data/<kind dir>/<sanitized name>`.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::scope::ContentKind;

/// Fixed segment between a scope's base directory and the kind directories.
pub const DATA_DIR: &str = "Data";

/// Removes every `/` from `name` so it cannot add path components.
///
/// Nothing else is touched: `..`, backslashes and other reserved characters
/// pass through unchanged.
pub fn sanitize_name(name: &str) -> Cow<'_, str> {
    if name.contains('/') {
        Cow::Owned(name.replace('/', ""))
    } else {
        Cow::Borrowed(name)
    }
}

/// `<base>/Data`, the directory `remove_all_items` deletes.
pub fn data_root(base: &Path) -> PathBuf {
    base.join(DATA_DIR)
}

/// `<base>/Data/<kind dir>`.
pub fn kind_dir(base: &Path, kind: ContentKind) -> PathBuf {
    data_root(base).join(kind.directory_root())
}

pub fn resource_path(base: &Path, kind: ContentKind, name: &str) -> PathBuf {
    kind_dir(base, kind).join(sanitize_name(name).as_ref())
}

/// A write is refused only when overwriting is disallowed and a file is
/// already there.
pub fn can_write_to_disk(overwrite: bool, exists: bool) -> bool {
    !matches!((overwrite, exists), (false, true))
}
