//! Team resources and their membership envelopes.
//!
//! Teams are read by name but updated, deleted and assigned users by uuid.

use serde::{Deserialize, Serialize};

use super::{null_as_default, Pacticipant, User, UserList};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Assigned by the server on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub name: String,
    #[serde(rename = "numberOfMembers", default, skip_serializing_if = "Option::is_none")]
    pub number_of_members: Option<u32>,
    #[serde(
        rename = "_embedded",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "TeamEmbedded::is_empty"
    )]
    pub embedded: TeamEmbedded,
}

/// Related resources the server embeds in a team representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamEmbedded {
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub pacticipants: Vec<Pacticipant>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<User>,
}

impl TeamEmbedded {
    pub fn is_empty(&self) -> bool {
        self.pacticipants.is_empty() && self.members.is_empty()
    }
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_pacticipants<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.embedded.pacticipants = names.into_iter().map(Pacticipant::new).collect();
        self
    }

    pub fn pacticipant_names(&self) -> Vec<&str> {
        self.embedded.pacticipants.iter().map(|p| p.name.as_str()).collect()
    }
}

/// Paging metadata returned alongside collection listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "totalElements", default)]
    pub total_elements: u64,
    #[serde(rename = "totalPages", default)]
    pub total_pages: u64,
    #[serde(default)]
    pub number: u64,
}

/// Response of `GET /admin/teams`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamList {
    #[serde(rename = "_embedded", default, deserialize_with = "null_as_default")]
    pub embedded: TeamListEmbedded,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<Page>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamListEmbedded {
    #[serde(default, deserialize_with = "null_as_default")]
    pub teams: Vec<Team>,
}

impl TeamList {
    pub fn teams(&self) -> &[Team] {
        &self.embedded.teams
    }

    pub fn into_teams(self) -> Vec<Team> {
        self.embedded.teams
    }
}

/// Body of `PUT /admin/teams/{uuid}/users`: the full set of member uuids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamsAssignmentRequest {
    #[serde(rename = "uuids")]
    pub users: Vec<String>,
}

impl TeamsAssignmentRequest {
    pub fn new<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            users: users.into_iter().map(Into::into).collect(),
        }
    }
}

/// Membership of the team after an assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamsAssignmentResponse {
    #[serde(rename = "_embedded", default, deserialize_with = "null_as_default")]
    pub embedded: UserList,
}

impl TeamsAssignmentResponse {
    pub fn users(&self) -> &[User] {
        &self.embedded.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_body_shape() {
        let team = Team::new("terraform-team").with_pacticipants(["terraform-client"]);
        let json = serde_json::to_value(&team).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "terraform-team",
                "_embedded": {"pacticipants": [{"name": "terraform-client"}]}
            })
        );
    }

    #[test]
    fn test_empty_embedded_is_omitted() {
        let team = Team::new("bare");
        let json = serde_json::to_string(&team).unwrap();
        assert!(!json.contains("_embedded"));
        assert!(!json.contains("uuid"));
    }

    #[test]
    fn test_parse_team_with_members() {
        let json = r#"{
            "uuid": "1234",
            "name": "terraform-team",
            "numberOfMembers": 1,
            "_embedded": {
                "pacticipants": [{"name": "terraform-client"}],
                "members": [{"uuid": "u-1", "email": "a@example.com", "active": true, "type": "user"}]
            }
        }"#;
        let team: Team = serde_json::from_str(json).unwrap();
        assert_eq!(team.uuid.as_deref(), Some("1234"));
        assert_eq!(team.pacticipant_names(), vec!["terraform-client"]);
        assert_eq!(team.embedded.members.len(), 1);
        assert_eq!(team.number_of_members, Some(1));
    }

    #[test]
    fn test_null_collections_decode_as_empty() {
        let json = r#"{"name": "t", "_embedded": {"pacticipants": null, "members": null}}"#;
        let team: Team = serde_json::from_str(json).unwrap();
        assert!(team.embedded.is_empty());

        let team: Team = serde_json::from_str(r#"{"name": "t", "_embedded": null}"#).unwrap();
        assert!(team.embedded.is_empty());
    }

    #[test]
    fn test_parse_paged_listing() {
        let json = r#"{
            "_embedded": {"teams": [{"uuid": "1", "name": "a"}, {"uuid": "2", "name": "b"}]},
            "page": {"size": 100, "totalElements": 2, "totalPages": 1, "number": 1}
        }"#;
        let list: TeamList = serde_json::from_str(json).unwrap();
        assert_eq!(list.teams().len(), 2);
        assert_eq!(list.page.map(|p| p.total_elements), Some(2));
    }

    #[test]
    fn test_assignment_request_uses_uuids_key() {
        let req = TeamsAssignmentRequest::new(["u-1", "u-2"]);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({"uuids": ["u-1", "u-2"]})
        );
    }
}
