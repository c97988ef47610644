//! Module identities: a module path plus an optional semantic version.
//!
//! Names are written `path` or `path@version`. Versions follow the lenient
//! Go-module flavour of semver:
//! - a leading `v` is optional (`v1.2.3` and `1.2.3` are both accepted)
//! - missing minor/patch components are padded with zero (`v1.2` is 1.2.0)
//! - prerelease and build metadata are kept (`v0.0.0-20200101-abcdef`,
//!   `v2.0.0+incompatible`)
//!
//! The version is always displayed exactly as written.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use depinambour_util::errors::DepError;
use semver::Version;

/// A parsed module version that remembers how it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleVersion {
    original: String,
    parsed: Version,
}

impl ModuleVersion {
    /// Parse a version string, returning a description of the problem on failure.
    pub fn parse(text: &str) -> Result<Self, String> {
        if text.is_empty() {
            return Err("empty version".to_string());
        }
        let parsed = Version::parse(&normalize(text)).map_err(|e| e.to_string())?;
        Ok(Self {
            original: text.to_string(),
            parsed,
        })
    }

    /// The version exactly as written.
    pub fn as_str(&self) -> &str {
        &self.original
    }

    pub fn semver(&self) -> &Version {
        &self.parsed
    }

    /// Semantic-version precedence. Build metadata does not take part, so
    /// `v2.0.0+incompatible` and `v2.0.0` compare equal.
    pub fn precedence(&self, other: &Self) -> Ordering {
        let a = &self.parsed;
        let b = &other.parsed;
        (a.major, a.minor, a.patch)
            .cmp(&(b.major, b.minor, b.patch))
            .then_with(|| a.pre.cmp(&b.pre))
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// Strip the optional `v` prefix and pad the numeric core to three components.
fn normalize(text: &str) -> String {
    let trimmed = text
        .strip_prefix('v')
        .or_else(|| text.strip_prefix('V'))
        .unwrap_or(text);
    let split = trimmed
        .find(|c: char| c == '-' || c == '+')
        .unwrap_or(trimmed.len());
    let (core, rest) = trimmed.split_at(split);

    let mut normalized = core.to_string();
    for _ in core.split('.').count()..3 {
        normalized.push_str(".0");
    }
    normalized.push_str(rest);
    normalized
}

/// The identity of a module: its path and, optionally, its version.
///
/// Two identities are equal iff their canonical names are equal.
#[derive(Debug, Clone)]
pub struct ModuleIdentity {
    path: String,
    version: Option<ModuleVersion>,
    canonical: String,
}

impl ModuleIdentity {
    /// Parse `path` or `path@version`. The name is split on the first `@`.
    pub fn parse(name: &str) -> Result<Self, DepError> {
        let parse_err = |message: String| DepError::Parse {
            name: name.to_string(),
            message,
        };

        let (path, version) = match name.split_once('@') {
            Some((path, version)) => (path, Some(version)),
            None => (name, None),
        };
        if path.is_empty() {
            return Err(parse_err("empty module path".to_string()));
        }

        let version = version
            .map(ModuleVersion::parse)
            .transpose()
            .map_err(|e| parse_err(format!("cannot parse mod version: {e}")))?;

        Ok(Self {
            path: path.to_string(),
            version,
            canonical: name.to_string(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> Option<&ModuleVersion> {
        self.version.as_ref()
    }

    /// `path` when unversioned, otherwise `path@version` as written.
    pub fn canonical_name(&self) -> &str {
        &self.canonical
    }

    /// Whether this module is held at a lower version than `other`.
    ///
    /// Returns `None` when the comparison is meaningless: different paths,
    /// or either side without a version.
    pub fn is_lower_than(&self, other: &Self) -> Option<bool> {
        if self.path != other.path {
            return None;
        }
        let (mine, theirs) = (self.version.as_ref()?, other.version.as_ref()?);
        Some(mine.precedence(theirs) == Ordering::Less)
    }
}

impl PartialEq for ModuleIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for ModuleIdentity {}

impl Hash for ModuleIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for ModuleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl std::str::FromStr for ModuleIdentity {
    type Err = DepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
