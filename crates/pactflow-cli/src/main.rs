//! Pactflow CLI - command line access to the Pactflow administration API.
//!
//! Resolves configuration from the environment (and `.env`), the config
//! file and the OS keychain, then runs a single client operation and prints
//! the result as JSON.

use std::io;

use anyhow::{bail, Context, Result};
use pactflow_core::auth::TokenStore;
use pactflow_core::models::{
    Pacticipant, SetUserRolesRequest, Team, TeamsAssignmentRequest, User,
};
use pactflow_core::{ApiClient, Config};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const USAGE: &str = "\
Usage: pactflow <command>

  login <base-url>                         store an access token in the keychain
  logout <base-url>                        remove the stored access token

  pacticipant list | get <name> | delete <name>
  pacticipant create <name> [repository-url]
  team list | get <name> | delete <uuid>
  team create <name> [pacticipant...]
  team assign <team-uuid> <user-uuid...>
  role list | get <uuid> | delete <uuid>
  user list | get <uuid> | delete <uuid>
  user invite <name> <email>
  user set-roles <user-uuid> <role-uuid...>
  secret list | get <uuid> | delete <uuid>

Environment: PACT_BROKER_BASE_URL, PACT_BROKER_TOKEN, PACT_BROKER_TIMEOUT_SECS, RUST_LOG";

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        [] | ["help"] | ["-h"] | ["--help"] => {
            println!("{}", USAGE);
            Ok(())
        }
        ["login", base_url] => login(base_url).await,
        ["logout", base_url] => {
            TokenStore::delete(base_url)?;
            info!(base_url = %base_url, "Access token removed");
            Ok(())
        }
        command => {
            let config = Config::resolve().context("Failed to load configuration")?;
            let client = ApiClient::new(&config)?;
            Command::parse(command)?.run(&client).await
        }
    }
}

/// Prompt for a token, verify it against the broker, then keep it.
async fn login(base_url: &str) -> Result<()> {
    let token = rpassword::prompt_password("Access token: ")
        .context("Failed to read access token")?;

    let mut config = Config::load().context("Failed to load configuration")?;
    config.base_url = base_url.to_string();
    config.access_token = Some(token.trim().to_string());

    let client = ApiClient::new(&config)?;
    client
        .list_roles()
        .await
        .context("Broker rejected the access token")?;

    TokenStore::store(base_url, token.trim())?;
    config.save().context("Failed to save configuration")?;
    info!(base_url = %base_url, "Logged in");
    Ok(())
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// A single client operation parsed from the command line.
#[derive(Debug, PartialEq)]
enum Command<'a> {
    ListPacticipants,
    GetPacticipant(&'a str),
    DeletePacticipant(&'a str),
    CreatePacticipant(Pacticipant),
    ListTeams,
    GetTeam(&'a str),
    DeleteTeam(&'a str),
    CreateTeam(Team),
    AssignTeam(&'a str, TeamsAssignmentRequest),
    ListRoles,
    GetRole(&'a str),
    DeleteRole(&'a str),
    ListUsers,
    GetUser(&'a str),
    DeleteUser(&'a str),
    InviteUser(User),
    SetUserRoles(&'a str, SetUserRolesRequest),
    ListSecrets,
    GetSecret(&'a str),
    DeleteSecret(&'a str),
}

impl<'a> Command<'a> {
    fn parse(args: &[&'a str]) -> Result<Self> {
        let command = match *args {
            // Pacticipants
            ["pacticipant", "list"] => Command::ListPacticipants,
            ["pacticipant", "get", name] => Command::GetPacticipant(name),
            ["pacticipant", "delete", name] => Command::DeletePacticipant(name),
            ["pacticipant", "create", name] => Command::CreatePacticipant(Pacticipant::new(name)),
            ["pacticipant", "create", name, url] => {
                Command::CreatePacticipant(Pacticipant::new(name).with_repository_url(url))
            }

            // Teams are fetched by name, everything else takes the uuid
            ["team", "list"] => Command::ListTeams,
            ["team", "get", name] => Command::GetTeam(name),
            ["team", "delete", uuid] => Command::DeleteTeam(uuid),
            ["team", "create", name, ref pacticipants @ ..] => {
                Command::CreateTeam(Team::new(name).with_pacticipants(pacticipants.iter().copied()))
            }
            ["team", "assign", uuid, ref users @ ..] if !users.is_empty() => {
                Command::AssignTeam(uuid, TeamsAssignmentRequest::new(users.iter().copied()))
            }

            // Roles
            ["role", "list"] => Command::ListRoles,
            ["role", "get", uuid] => Command::GetRole(uuid),
            ["role", "delete", uuid] => Command::DeleteRole(uuid),

            // Users
            ["user", "list"] => Command::ListUsers,
            ["user", "get", uuid] => Command::GetUser(uuid),
            ["user", "delete", uuid] => Command::DeleteUser(uuid),
            ["user", "invite", name, email] => Command::InviteUser(User::invite(name, email)),
            ["user", "set-roles", uuid, ref roles @ ..] => {
                Command::SetUserRoles(uuid, SetUserRolesRequest::new(roles.iter().copied()))
            }

            // Secrets
            ["secret", "list"] => Command::ListSecrets,
            ["secret", "get", uuid] => Command::GetSecret(uuid),
            ["secret", "delete", uuid] => Command::DeleteSecret(uuid),

            _ => bail!("Unknown command: {}\n\n{}", args.join(" "), USAGE),
        };
        Ok(command)
    }

    async fn run(self, client: &ApiClient) -> Result<()> {
        match self {
            Command::ListPacticipants => print(&client.list_pacticipants().await?),
            Command::GetPacticipant(name) => print(&client.read_pacticipant(name).await?),
            Command::DeletePacticipant(name) => Ok(client.delete_pacticipant(name).await?),
            Command::CreatePacticipant(p) => print(&client.create_pacticipant(&p).await?),
            Command::ListTeams => print(&client.list_teams().await?.into_teams()),
            Command::GetTeam(name) => print(&client.read_team(name).await?),
            Command::DeleteTeam(uuid) => Ok(client.delete_team(uuid).await?),
            Command::CreateTeam(team) => print(&client.create_team(&team).await?),
            Command::AssignTeam(uuid, request) => {
                print(&client.update_team_assignments(uuid, &request).await?.embedded.users)
            }
            Command::ListRoles => print(&client.list_roles().await?),
            Command::GetRole(uuid) => print(&client.read_role(uuid).await?),
            Command::DeleteRole(uuid) => Ok(client.delete_role(uuid).await?),
            Command::ListUsers => print(&client.list_users().await?),
            Command::GetUser(uuid) => print(&client.read_user(uuid).await?),
            Command::DeleteUser(uuid) => Ok(client.delete_user(uuid).await?),
            Command::InviteUser(user) => print(&client.create_user(&user).await?),
            Command::SetUserRoles(uuid, request) => Ok(client.set_user_roles(uuid, &request).await?),
            Command::ListSecrets => print(&client.list_secrets().await?),
            Command::GetSecret(uuid) => print(&client.read_secret(uuid).await?),
            Command::DeleteSecret(uuid) => Ok(client.delete_secret(uuid).await?),
        }
    }
}
