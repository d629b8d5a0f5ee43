use serde::{Deserialize, Serialize};

/// A stored credential.
///
/// `value` is write-only: the server does not return it on reads, and it is
/// omitted from request bodies when unset.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "teamUuid", default, skip_serializing_if = "Option::is_none")]
    pub team_uuid: Option<String>,
}

impl Secret {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            ..Self::default()
        }
    }
}

// Keep secret values out of logs
impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secret")
            .field("uuid", &self.uuid)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("value", &self.value.as_ref().map(|_| "<redacted>"))
            .field("team_uuid", &self.team_uuid)
            .finish()
    }
}
