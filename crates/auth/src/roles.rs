use std::borrow::{Borrow, Cow};

use serde::{Deserialize, Serialize};

use opsdesk_core::{Entity, RoleId};

/// Stable role identifier (e.g. `"viewer"`), used everywhere a role is named.
///
/// Codes are opaque at this layer; their authority comes from the
/// [`RoleHierarchy`](crate::RoleHierarchy) they are looked up in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleCode(Cow<'static, str>);

impl RoleCode {
    pub fn new(code: impl Into<Cow<'static, str>>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for RoleCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RoleCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RoleCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for RoleCode {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RoleCode {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// A role as listed by the directory's role catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub id: RoleId,
    pub code: RoleCode,
    pub name: String,
    /// Authority rank; smaller numbers mean greater authority.
    pub level: i32,
}

impl Entity for RoleRecord {
    type Id = RoleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
