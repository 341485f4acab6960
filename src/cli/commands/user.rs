use std::sync::atomic::{AtomicU64, Ordering};

use tabled::{Table, Tabled, settings::Style};

use crate::cli::error::{CliError, CliResult};
use crate::db::utils::current_timestamp;
use crate::db::{Database, Id, NewUser, User, UserPatch, UserRepository};

use super::{format_timestamp, truncate};

#[derive(Tabled)]
struct UserDisplay {
    #[tabled(rename = "ID")]
    id: Id,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "API Key")]
    api_key: String,
    #[tabled(rename = "Created")]
    created_at: String,
}

impl From<&User> for UserDisplay {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: truncate(&user.name, 30),
            api_key: truncate(&user.api_key, 19),
            created_at: format_timestamp(user.created_at),
        }
    }
}

static KEY_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Derive a fresh 64-char hex key from the name, the current instant and a
/// per-process counter.
pub fn generate_api_key(name: &str) -> String {
    use sha2::{Digest, Sha256};
    let nanos = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(current_timestamp);
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update(nanos.to_le_bytes());
    hasher.update(KEY_COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes());
    format!("{:x}", hasher.finalize())
}

/// Register a user, generating an API key when none is given
pub async fn add_user<D: Database>(db: &D, name: &str, api_key: Option<&str>) -> CliResult<String> {
    let api_key = match api_key {
        Some(key) => key.to_string(),
        None => generate_api_key(name),
    };

    let user = db
        .users()
        .create(&NewUser {
            name: name.to_string(),
            api_key,
        })
        .await?;

    Ok(format!(
        "✓ Created user: {} (id {})\n  API key: {}",
        user.name, user.id, user.api_key
    ))
}

/// List users
pub async fn list_users<D: Database>(db: &D, format: &str) -> CliResult<String> {
    let users = db.users().list().await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&users)?),
        _ => Ok(format_table(&users)),
    }
}

fn format_table(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }

    let display_users: Vec<UserDisplay> = users.iter().map(UserDisplay::from).collect();
    let mut table = Table::new(display_users);
    table.with(Style::rounded());
    table.to_string()
}

/// Update a user (partial; empty values keep the stored field)
pub async fn update_user<D: Database>(
    db: &D,
    id: Id,
    name: Option<String>,
    api_key: Option<String>,
) -> CliResult<String> {
    let patch = UserPatch { name, api_key };
    if patch == UserPatch::default() {
        return Err(CliError::InvalidArgument {
            message: "nothing to update, pass --name or --api-key".to_string(),
        });
    }

    let user = db.users().update(id, &patch).await?;
    Ok(format!("✓ Updated user: {} (id {})", user.name, user.id))
}

/// Delete a user
pub async fn delete_user<D: Database>(db: &D, id: Id) -> CliResult<String> {
    if db.users().delete(id).await? {
        Ok(format!("✓ Deleted user {}", id))
    } else {
        Ok(format!("No user with id {}; nothing deleted", id))
    }
}
