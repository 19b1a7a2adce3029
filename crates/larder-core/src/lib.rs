//! Scoped on-disk storage for dictionaries, byte blobs and text.
//!
//! Resources are addressed by `(scope, kind, name)` and live at
//! `<base(scope)>/Data/<kind dir>/<name>`. The base directories come from a
//! [`BaseDirs`] resolver: the host's cache/documents directories by default,
//! or explicit roots.

pub mod codec;
pub mod config;
pub mod error;
pub mod path;
pub mod resolver;
pub mod scope;
pub mod store;

pub use codec::Dictionary;
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use resolver::{BaseDirs, FixedDirs, LayeredDirs, SystemDirs};
pub use scope::{ContentKind, Scope};
pub use store::{LocalStore, WriteOutcome};
