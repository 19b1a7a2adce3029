use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Which base directory a resource lives under.
///
/// `Cache` is the per-user cache directory: the OS may purge it. `Documents`
/// is the per-user documents directory and is expected to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scope {
    Cache,
    Documents,
}

impl Scope {
    pub const ALL: [Scope; 2] = [Scope::Cache, Scope::Documents];

    pub fn name(self) -> &'static str {
        match self {
            Scope::Cache => "cache",
            Scope::Documents => "documents",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::ALL
            .into_iter()
            .find(|scope| scope.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownScope(s.to_string()))
    }
}

/// Kind of payload stored, which fixes the subdirectory it lands in.
///
/// `Image` only reserves its directory: there are no image save/load
/// operations, but paths can be probed and removed like any other kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Dictionary,
    Generic,
    Text,
    Image,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Dictionary,
        ContentKind::Generic,
        ContentKind::Text,
        ContentKind::Image,
    ];

    /// Subdirectory under `Data/` holding resources of this kind.
    pub fn directory_root(self) -> &'static str {
        match self {
            ContentKind::Dictionary => "Dictionary",
            ContentKind::Generic => "Generics",
            ContentKind::Text => "Texts",
            ContentKind::Image => "Images",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ContentKind::Dictionary => "dictionary",
            ContentKind::Generic => "generic",
            ContentKind::Text => "text",
            ContentKind::Image => "image",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownContentKind(s.to_string()))
    }
}
