use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A single grant within a role. `scope` identifies it to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Permission {
    pub fn scoped(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            ..Self::default()
        }
    }
}

/// A named, ordered bundle of permissions.
///
/// Roles are replaced wholesale on update, so `permissions` is always sent,
/// even when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub permissions: Vec<Permission>,
}

impl Role {
    pub fn new<I, S>(name: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            uuid: None,
            name: name.into(),
            permissions: scopes.into_iter().map(Permission::scoped).collect(),
        }
    }

    pub fn scopes(&self) -> Vec<&str> {
        self.permissions.iter().map(|p| p.scope.as_str()).collect()
    }
}
