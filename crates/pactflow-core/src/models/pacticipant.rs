use serde::{Deserialize, Serialize};

/// An application registered with the broker.
///
/// Pacticipants are addressed by `name` in every path and are updated with
/// PATCH, so every field except the name is omitted when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacticipant {
    pub name: String,
    #[serde(rename = "repositoryUrl", default, skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    #[serde(rename = "displayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "mainBranch", default, skip_serializing_if = "Option::is_none")]
    pub main_branch: Option<String>,
    #[serde(rename = "repositoryName", default, skip_serializing_if = "Option::is_none")]
    pub repository_name: Option<String>,
    #[serde(rename = "repositoryNamespace", default, skip_serializing_if = "Option::is_none")]
    pub repository_namespace: Option<String>,
}

impl Pacticipant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_repository_url(mut self, url: impl Into<String>) -> Self {
        self.repository_url = Some(url.into());
        self
    }
}
