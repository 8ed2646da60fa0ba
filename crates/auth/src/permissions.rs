use core::str::FromStr;

use serde::{Deserialize, Serialize};

use opsdesk_core::{DomainError, DomainResult, Entity, PermissionId};

/// A capability issued by the directory, e.g. `task.read.own`.
///
/// Always referenced canonically as `resource_type.action.scope`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    pub id: PermissionId,
    pub resource_type: String,
    pub action: String,
    pub scope: String,
}

impl Permission {
    pub fn new(
        id: PermissionId,
        resource_type: impl Into<String>,
        action: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            id,
            resource_type: resource_type.into(),
            action: action.into(),
            scope: scope.into(),
        }
    }

    pub fn key(&self) -> PermissionKey {
        PermissionKey::new(&self.resource_type, &self.action, &self.scope)
    }
}

impl Entity for Permission {
    type Id = PermissionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}.{}", self.resource_type, self.action, self.scope)
    }
}

/// The `(resource_type, action, scope)` triple a requirement is matched on.
///
/// Matching is exact on all three fields. `own` does not imply
/// `organization` (or the reverse); there are no wildcards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PermissionKey {
    pub resource_type: String,
    pub action: String,
    pub scope: String,
}

impl PermissionKey {
    pub fn new(
        resource_type: impl Into<String>,
        action: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            action: action.into(),
            scope: scope.into(),
        }
    }

    /// Parse `resource_type.action.scope`.
    ///
    /// Exactly three non-empty dot-separated fields; anything else is a
    /// validation error.
    pub fn parse(s: &str) -> DomainResult<Self> {
        let mut parts = s.split('.');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(resource), Some(action), Some(scope), None)
                if !resource.is_empty() && !action.is_empty() && !scope.is_empty() =>
            {
                Ok(Self::new(resource, action, scope))
            }
            _ => Err(DomainError::validation(format!(
                "permission '{s}' is not of the form resource_type.action.scope"
            ))),
        }
    }
}

impl FromStr for PermissionKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl core::fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}.{}", self.resource_type, self.action, self.scope)
    }
}
