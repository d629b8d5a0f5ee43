//! API client for the Pactflow administration API.
//!
//! This module provides the `ApiClient` struct. Every public operation is a
//! thin wrapper over [`ApiClient::execute`], which owns URL construction,
//! bearer-token injection and status classification.

use std::time::Duration;

use reqwest::{header, Client, Method, Response, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{
    Pacticipant, Role, Secret, SetUserRolesRequest, Team, TeamList, TeamsAssignmentRequest,
    TeamsAssignmentResponse, User, UserList,
};

use super::{ApiError, Result};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds when the config does not set one.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Media types accepted from the broker.
const ACCEPT_HAL_JSON: &str = "application/hal+json, application/json";

const CONTENT_TYPE_JSON: &str = "application/json";

/// API client for the Pactflow administration API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl ApiClient {
    /// Create a new API client with its own connection pool.
    pub fn new(config: &Config) -> Result<Self> {
        let timeout = config.timeout_secs.unwrap_or(REQUEST_TIMEOUT_SECS);
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {}", e)))?;

        Self::with_http_client(config, client)
    }

    /// Create an API client on top of a caller-supplied transport.
    pub fn with_http_client(config: &Config, client: Client) -> Result<Self> {
        let base_url = Self::parse_base_url(&config.base_url)?;

        let token = config
            .access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Config("an access token is required".to_string()))?;

        if header::HeaderValue::from_str(&format!("Bearer {}", token)).is_err() {
            return Err(ApiError::Config(
                "access token contains characters that are not valid in an HTTP header".to_string(),
            ));
        }

        Ok(Self {
            client,
            base_url,
            token: token.to_string(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn parse_base_url(raw: &str) -> Result<Url> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ApiError::Config("a base URL is required".to_string()));
        }

        let url = Url::parse(raw)
            .map_err(|e| ApiError::Config(format!("invalid base URL {:?}: {}", raw, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "base URL must use http or https, got {:?}",
                url.scheme()
            )));
        }
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(ApiError::Config(format!("base URL {:?} has no host", raw)));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ApiError::Config(format!(
                "base URL {:?} must not contain a query or fragment",
                raw
            )));
        }

        Ok(url)
    }

    /// Append percent-encoded path segments to the base URL, keeping any
    /// path prefix the base URL already has.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Config(format!("base URL {} cannot have a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Reject identifiers that would turn into a collection path: blanks,
    /// and dot segments, which URL normalisation drops.
    fn require_id<'a>(value: &'a str, what: &'static str) -> Result<&'a str> {
        match value.trim() {
            "" => Err(ApiError::MissingIdentifier(what)),
            "." | ".." => Err(ApiError::InvalidRequest(format!(
                "{} {:?} is not a valid path identifier",
                what, value
            ))),
            _ => Ok(value),
        }
    }

    /// Reject server-assigned identifiers on create.
    fn require_unassigned(uuid: &Option<String>, what: &str) -> Result<()> {
        match uuid {
            Some(_) => Err(ApiError::InvalidRequest(format!(
                "{} uuid is assigned by the server and must not be set on create",
                what
            ))),
            None => Ok(()),
        }
    }

    fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Vec<u8>> {
        serde_json::to_vec(body).map_err(ApiError::Encode)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let path = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status, &path, &body);
        warn!(%status, path = %path, error = %err, "API request failed");
        Err(err)
    }

    /// Send one request and classify the response.
    ///
    /// A body, when given, is already JSON-encoded. Non-2xx responses come
    /// back as `ApiError::NotFound` or `ApiError::Api`.
    async fn execute(&self, method: Method, segments: &[&str], body: Option<Vec<u8>>) -> Result<Response> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, has_body = body.is_some(), "sending request");

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .bearer_auth(&self.token)
            .header(header::ACCEPT, ACCEPT_HAL_JSON);

        if let Some(body) = body {
            request = request
                .header(header::CONTENT_TYPE, CONTENT_TYPE_JSON)
                .body(body);
        }

        let response = request.send().await?;
        debug!(%method, %url, status = %response.status(), "received response");

        Self::check_response(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let path = response.url().path().to_string();
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|source| ApiError::Decode { path, source })
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let response = self.execute(Method::GET, segments, None).await?;
        Self::decode(response).await
    }

    async fn send_json<B, T>(&self, method: Method, segments: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(method, segments, Some(Self::encode(body)?)).await?;
        Self::decode(response).await
    }

    async fn delete(&self, segments: &[&str]) -> Result<()> {
        self.execute(Method::DELETE, segments, None).await?;
        Ok(())
    }

    // ===== Pacticipants =====

    pub async fn create_pacticipant(&self, pacticipant: &Pacticipant) -> Result<Pacticipant> {
        self.send_json(Method::POST, &["pacticipants"], pacticipant).await
    }

    pub async fn read_pacticipant(&self, name: &str) -> Result<Pacticipant> {
        let name = Self::require_id(name, "pacticipant name")?;
        self.get(&["pacticipants", name]).await
    }

    /// Partial update: fields left unset are not touched on the server.
    pub async fn update_pacticipant(&self, pacticipant: &Pacticipant) -> Result<Pacticipant> {
        let name = Self::require_id(&pacticipant.name, "pacticipant name")?;
        self.send_json(Method::PATCH, &["pacticipants", name], pacticipant).await
    }

    pub async fn delete_pacticipant(&self, name: &str) -> Result<()> {
        let name = Self::require_id(name, "pacticipant name")?;
        self.delete(&["pacticipants", name]).await
    }

    pub async fn list_pacticipants(&self) -> Result<Vec<Pacticipant>> {
        let list: PacticipantList = self.get(&["pacticipants"]).await?;
        Ok(list.embedded.pacticipants)
    }

    // ===== Teams =====
    // Teams are read by name but updated, deleted and assigned by uuid.

    pub async fn create_team(&self, team: &Team) -> Result<Team> {
        Self::require_unassigned(&team.uuid, "team")?;
        self.send_json(Method::POST, &["admin", "teams"], team).await
    }

    pub async fn read_team(&self, name: &str) -> Result<Team> {
        let name = Self::require_id(name, "team name")?;
        self.get(&["admin", "teams", name]).await
    }

    pub async fn update_team(&self, team: &Team) -> Result<Team> {
        let uuid = Self::require_id(team.uuid.as_deref().unwrap_or_default(), "team uuid")?;
        self.send_json(Method::PUT, &["admin", "teams", uuid], team).await
    }

    pub async fn delete_team(&self, uuid: &str) -> Result<()> {
        let uuid = Self::require_id(uuid, "team uuid")?;
        self.delete(&["admin", "teams", uuid]).await
    }

    pub async fn list_teams(&self) -> Result<TeamList> {
        self.get(&["admin", "teams"]).await
    }

    /// Replace the team's members with the users in `request`.
    pub async fn update_team_assignments(
        &self,
        team_uuid: &str,
        request: &TeamsAssignmentRequest,
    ) -> Result<TeamsAssignmentResponse> {
        let uuid = Self::require_id(team_uuid, "team uuid")?;
        self.send_json(Method::PUT, &["admin", "teams", uuid, "users"], request).await
    }

    // ===== Secrets =====

    pub async fn create_secret(&self, secret: &Secret) -> Result<Secret> {
        Self::require_unassigned(&secret.uuid, "secret")?;
        self.send_json(Method::POST, &["secrets"], secret).await
    }

    pub async fn read_secret(&self, uuid: &str) -> Result<Secret> {
        let uuid = Self::require_id(uuid, "secret uuid")?;
        self.get(&["secrets", uuid]).await
    }

    pub async fn update_secret(&self, secret: &Secret) -> Result<Secret> {
        let uuid = Self::require_id(secret.uuid.as_deref().unwrap_or_default(), "secret uuid")?;
        self.send_json(Method::PUT, &["secrets", uuid], secret).await
    }

    pub async fn delete_secret(&self, uuid: &str) -> Result<()> {
        let uuid = Self::require_id(uuid, "secret uuid")?;
        self.delete(&["secrets", uuid]).await
    }

    pub async fn list_secrets(&self) -> Result<Vec<Secret>> {
        let list: SecretList = self.get(&["secrets"]).await?;
        Ok(list.embedded.secrets)
    }

    // ===== Roles =====

    pub async fn create_role(&self, role: &Role) -> Result<Role> {
        Self::require_unassigned(&role.uuid, "role")?;
        self.send_json(Method::POST, &["admin", "roles"], role).await
    }

    pub async fn read_role(&self, uuid: &str) -> Result<Role> {
        let uuid = Self::require_id(uuid, "role uuid")?;
        self.get(&["admin", "roles", uuid]).await
    }

    pub async fn update_role(&self, role: &Role) -> Result<Role> {
        let uuid = Self::require_id(role.uuid.as_deref().unwrap_or_default(), "role uuid")?;
        self.send_json(Method::PUT, &["admin", "roles", uuid], role).await
    }

    pub async fn delete_role(&self, uuid: &str) -> Result<()> {
        let uuid = Self::require_id(uuid, "role uuid")?;
        self.delete(&["admin", "roles", uuid]).await
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>> {
        let list: RoleList = self.get(&["admin", "roles"]).await?;
        Ok(list.embedded.roles)
    }

    // ===== Users =====

    /// Invite a single user and return the account the server created.
    pub async fn create_user(&self, user: &User) -> Result<User> {
        Self::require_unassigned(&user.uuid, "user")?;
        let body = UserInviteRequest {
            users: std::slice::from_ref(user),
        };
        let response: UserInviteResponse = self
            .send_json(Method::POST, &["admin", "users", "invite-user"], &body)
            .await?;

        response
            .embedded
            .users
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::InvalidResponse {
                path: "/admin/users/invite-user".to_string(),
                message: "invitation returned no users".to_string(),
            })
    }

    pub async fn read_user(&self, uuid: &str) -> Result<User> {
        let uuid = Self::require_id(uuid, "user uuid")?;
        self.get(&["admin", "users", uuid]).await
    }

    pub async fn update_user(&self, user: &User) -> Result<User> {
        let uuid = Self::require_id(user.uuid.as_deref().unwrap_or_default(), "user uuid")?;
        self.send_json(Method::PUT, &["admin", "users", uuid], user).await
    }

    pub async fn delete_user(&self, uuid: &str) -> Result<()> {
        let uuid = Self::require_id(uuid, "user uuid")?;
        self.delete(&["admin", "users", uuid]).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let list: UserListResponse = self.get(&["admin", "users"]).await?;
        Ok(list.embedded.users)
    }

    /// Replace the user's roles. The server answers with an empty body.
    pub async fn set_user_roles(&self, user_uuid: &str, request: &SetUserRolesRequest) -> Result<()> {
        let uuid = Self::require_id(user_uuid, "user uuid")?;
        self.execute(
            Method::PUT,
            &["admin", "users", uuid, "roles"],
            Some(Self::encode(request)?),
        )
        .await?;
        Ok(())
    }
}

// Internal API envelope types

#[derive(Debug, Serialize)]
struct UserInviteRequest<'a> {
    users: &'a [User],
}

#[derive(Debug, Deserialize)]
struct UserInviteResponse {
    #[serde(rename = "_embedded")]
    embedded: UserList,
}

#[derive(Debug, Deserialize)]
struct UserListResponse {
    #[serde(rename = "_embedded", default)]
    embedded: UserList,
}

#[derive(Debug, Default, Deserialize)]
struct PacticipantList {
    #[serde(rename = "_embedded", default)]
    embedded: PacticipantListEmbedded,
}

#[derive(Debug, Default, Deserialize)]
struct PacticipantListEmbedded {
    #[serde(default)]
    pacticipants: Vec<Pacticipant>,
}

#[derive(Debug, Default, Deserialize)]
struct SecretList {
    #[serde(rename = "_embedded", default)]
    embedded: SecretListEmbedded,
}

#[derive(Debug, Default, Deserialize)]
struct SecretListEmbedded {
    #[serde(default)]
    secrets: Vec<Secret>,
}

#[derive(Debug, Default, Deserialize)]
struct RoleList {
    #[serde(rename = "_embedded", default)]
    embedded: RoleListEmbedded,
}

#[derive(Debug, Default, Deserialize)]
struct RoleListEmbedded {
    #[serde(default)]
    roles: Vec<Role>,
}
