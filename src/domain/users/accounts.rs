//! Customer and admin accounts over the `users` table. Passwords are kept as bcrypt hashes.

use anyhow::Context;
use jiff_sqlx::ToSqlx;
use sqlx::PgPool;
use strum_macros::Display;

use crate::domain::UserId;

use super::UserError;

const MIN_PASSWORD_LENGTH: usize = 6;

//------------------------- Model ------------------------------

// We use a INT postgres representation.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Display,
    serde::Serialize,
    serde::Deserialize,
    sqlx::Type,
)]
#[repr(i32)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    Customer = 0,
    Admin = 1,
}

/// A registered account. The password hash never leaves this module.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "id")]
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct SignupPayload {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupPayload {
    pub fn validate(&self) -> Result<(), UserError> {
        let blank = [
            ("name", self.name.trim()),
            ("email", self.email.trim()),
            ("password", self.password.as_str()),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty());

        if let Some((field, _)) = blank {
            return Err(UserError::MissingField(field));
        }
        if !is_valid_email(&self.email) {
            return Err(UserError::InvalidEmail);
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(UserError::PasswordTooShort(MIN_PASSWORD_LENGTH));
        }
        Ok(())
    }
}

/// Emails are matched trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `local@host.tld` without whitespace.
fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && domain
                .rsplit_once('.')
                .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
    })
}

#[derive(sqlx::FromRow, Debug)]
struct UserRow {
    user_id: UserId,
    name: String,
    email: String,
    role: Role,
    created_at: jiff_sqlx::Timestamp,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            role: row.role,
            created_at: row.created_at.to_jiff(),
        }
    }
}

#[derive(sqlx::FromRow, Debug)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

//------------------------- Passwords ---------------------------

/// Hashing is CPU bound and runs on the blocking pool.
pub async fn hash_password(password: String, cost: u32) -> Result<String, anyhow::Error> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("Password hashing task failed.")?
        .context("Password could not be hashed.")
}

async fn password_matches(password: String, password_hash: String) -> Result<bool, anyhow::Error> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
        .await
        .context("Password verification task failed.")?
        .context("Stored password hash is invalid.")
}

//--------------------------- SQL -------------------------------

const USER_COLUMNS: &str = "user_id, name, email, role, created_at";

/// `None` when the email is already registered.
pub async fn insert_user(
    pool: &PgPool,
    user_id: &UserId,
    name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<Option<User>, anyhow::Error> {
    let row: Option<UserRow> = sqlx::query_as(&format!(
        r#"INSERT INTO users (user_id, name, email, password_hash, role, created_at)
           VALUES ($1, $2, $3, $4, $5, $6)
           ON CONFLICT (email) DO NOTHING
           RETURNING {USER_COLUMNS}"#
    ))
    .bind(user_id)
    .bind(name)
    .bind(normalize_email(email))
    .bind(password_hash)
    .bind(role)
    .bind(jiff::Timestamp::now().to_sqlx())
    .fetch_optional(pool)
    .await
    .with_context(|| format!("Problem in insert_user({user_id})."))?;

    Ok(row.map(Into::into))
}

pub async fn find_user(pool: &PgPool, user_id: &UserId) -> Result<Option<User>, anyhow::Error> {
    let row: Option<UserRow> = sqlx::query_as(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .with_context(|| format!("Problem in find_user({user_id})."))?;

    Ok(row.map(Into::into))
}

/// The account the credentials belong to. `None` for an unknown email or a wrong password.
pub async fn verify_credentials(
    pool: &PgPool,
    email: &str,
    password: &str,
) -> Result<Option<User>, anyhow::Error> {
    let row: Option<CredentialRow> = sqlx::query_as(&format!(
        "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1"
    ))
    .bind(normalize_email(email))
    .fetch_optional(pool)
    .await
    .context("Problem in verify_credentials.")?;

    let Some(row) = row else {
        return Ok(None);
    };
    let matches = password_matches(password.to_owned(), row.password_hash).await?;
    Ok(matches.then(|| row.user.into()))
}

//-------------------------- Tests -------------------------------
