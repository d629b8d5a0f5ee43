use std::fmt;

use serde::{Deserialize, Serialize};

use super::{null_as_default, Role, Team};

/// Kind of account.
///
/// Values the client does not know about are kept verbatim in `Other` so a
/// read-modify-write cycle never rewrites them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserType {
    Regular,
    System,
    Other(String),
}

impl From<String> for UserType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "user" => UserType::Regular,
            "system" => UserType::System,
            _ => UserType::Other(value),
        }
    }
}

impl From<UserType> for String {
    fn from(value: UserType) -> Self {
        match value {
            UserType::Regular => "user".to_string(),
            UserType::System => "system".to_string(),
            UserType::Other(raw) => raw,
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserType::Regular => write!(f, "user"),
            UserType::System => write!(f, "system"),
            UserType::Other(raw) => write!(f, "{}", raw),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserType>,
    #[serde(
        rename = "_embedded",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "UserEmbedded::is_empty"
    )]
    pub embedded: UserEmbedded,
}

impl User {
    /// A regular, active account ready to be invited.
    pub fn invite(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            active: true,
            user_type: Some(UserType::Regular),
            ..Self::default()
        }
    }

    pub fn role_uuids(&self) -> Vec<&str> {
        self.embedded
            .roles
            .iter()
            .filter_map(|r| r.uuid.as_deref())
            .collect()
    }
}

/// Roles and teams the server embeds in a user representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEmbedded {
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Role>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<Team>,
}

impl UserEmbedded {
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.teams.is_empty()
    }
}

/// `{"users": [...]}` as found under `_embedded` in user collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: Vec<User>,
}

/// Body of `PUT /admin/users/{uuid}/roles`: the full set of role uuids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetUserRolesRequest {
    pub roles: Vec<String>,
}

impl SetUserRolesRequest {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}
