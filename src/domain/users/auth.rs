//! Sign up, sign in and the caller identity carried by the `user-id` header.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    domain::UserId,
    infra::{ClientError, Settings},
};

use super::{
    Role, SignupPayload, User, UserError, find_user, hash_password, insert_user, normalize_email,
    verify_credentials,
};

const USER_ID_HEADER: &str = "user-id";

//------------------------- Web API ----------------------------

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: User,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct SigninPayload {
    pub email: String,
    pub password: String,
}

pub async fn signup_endpoint(
    State(pool): State<PgPool>,
    State(settings): State<Settings>,
    Json(payload): Json<SignupPayload>,
) -> Result<(StatusCode, Json<AuthResponse>), ClientError> {
    payload.validate()?;

    let email = normalize_email(&payload.email);
    let role = if settings.users.is_admin_email(&email) {
        Role::Admin
    } else {
        Role::Customer
    };
    let password_hash = hash_password(payload.password, settings.users.password_hash_cost).await?;
    let user = insert_user(
        &pool,
        &UserId::new(),
        payload.name.trim(),
        &email,
        &password_hash,
        role,
    )
    .await?
    .ok_or(UserError::AlreadyExists)?;

    info!("User {} registered with role {}.", user.user_id, user.role);
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            user,
        }),
    ))
}

pub async fn signin_endpoint(
    State(pool): State<PgPool>,
    Json(payload): Json<SigninPayload>,
) -> Result<Json<AuthResponse>, ClientError> {
    let Some(user) = verify_credentials(&pool, &payload.email, &payload.password).await? else {
        warn!("Failed sign in for {}.", normalize_email(&payload.email));
        return Err(UserError::InvalidCredentials.into());
    };
    Ok(Json(AuthResponse {
        success: true,
        user,
    }))
}

//------------------------- Identity ---------------------------

/// The caller's identity. Missing or malformed ids are unauthorized.
pub fn user_id_from_headers(headers: &HeaderMap) -> Result<UserId, ClientError> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<Uuid>().ok())
        .and_then(|uuid| UserId::try_from(uuid).ok())
        .ok_or(ClientError::Unauthorized)
}

/// The calling admin. Unknown callers are unauthorized and customers are forbidden.
pub async fn require_admin(pool: &PgPool, headers: &HeaderMap) -> Result<User, ClientError> {
    let user_id = user_id_from_headers(headers)?;
    let user = find_user(pool, &user_id)
        .await?
        .ok_or(ClientError::Unauthorized)?;
    if user.role != Role::Admin {
        return Err(UserError::AdminRequired.into());
    }
    Ok(user)
}

//-------------------------- Tests -------------------------------
