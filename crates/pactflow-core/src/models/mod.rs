//! Data models for Pactflow administration resources.
//!
//! This module contains the wire shapes exchanged with the API:
//!
//! - `Pacticipant`: a registered application, addressed by name
//! - `Team`, `TeamList`: teams with embedded pacticipants and members
//! - `User`, `UserType`: accounts with embedded roles and teams
//! - `Role`, `Permission`: named permission bundles
//! - `Secret`: stored credentials (value is write-only)
//! - Envelopes: `TeamsAssignmentRequest`, `TeamsAssignmentResponse`, `SetUserRolesRequest`
//!
//! Optional fields are skipped when absent so that partial updates never
//! overwrite server state with nulls. Embedded collections decode `null`,
//! missing and `[]` alike as empty.

pub mod pacticipant;
pub mod role;
pub mod secret;
pub mod team;
pub mod user;

use serde::{Deserialize, Deserializer};

pub use pacticipant::Pacticipant;
pub use role::{Permission, Role};
pub use secret::Secret;
pub use team::{Page, Team, TeamEmbedded, TeamList, TeamsAssignmentRequest, TeamsAssignmentResponse};
pub use user::{SetUserRolesRequest, User, UserEmbedded, UserList, UserType};

/// Treat an explicit JSON `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
