use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    error::{AppError, FieldError},
    models::{
        session::Session,
        trip::{Participant, FALLBACK_PARTICIPANT_NAME},
        user::User,
    },
    state::AppState,
    validators::{email_validator, name_validator, password_validator},
};

pub const SESSION_COOKIE: &str = "bluewave_session";

const SESSION_TTL_DAYS: i64 = 30;

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub email: String,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            uuid: user.uuid,
            name: user.name,
            email: user.email,
        }
    }
}

impl AuthenticatedUser {
    /// The participant record a signup appends for this user.
    pub fn participant(&self) -> Participant {
        let name = self.name.trim();
        Participant {
            id: self.uuid.clone(),
            name: if name.is_empty() {
                FALLBACK_PARTICIPANT_NAME.to_string()
            } else {
                name.to_string()
            },
        }
    }
}

/// The session resolved for one request, or `None` when nobody is signed in.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<AuthenticatedUser>);

impl CurrentUser {
    pub fn require_user(&self) -> Result<&AuthenticatedUser, AppError> {
        self.0.as_ref().ok_or(AppError::Unauthorized)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let jar = PrivateCookieJar::from_request_parts(parts, state)
            .await
            .map_err(|err| -> AppError { match err {} })?;
        let user = session_user(state, &jar).await?;
        Ok(Self(user))
    }
}

pub async fn register_user(
    state: &AppState,
    name: &str,
    email: &str,
    password: &str,
) -> Result<AuthenticatedUser, AppError> {
    let mut errors = Vec::new();
    if let Some(message) = name_validator(name) {
        errors.push(FieldError::new("name", message));
    }
    if let Some(message) = email_validator(email) {
        errors.push(FieldError::new("email", message));
    }
    if let Some(message) = password_validator(password) {
        errors.push(FieldError::new("password", message));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let taken: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?1")
        .bind(email)
        .fetch_one(&state.db)
        .await?;
    if taken > 0 {
        return Err(AppError::Validation(vec![FieldError::new(
            "email",
            "An account with this email already exists.",
        )]));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AppError::Other(anyhow::anyhow!("hash password: {err}")))?
        .to_string();

    let uuid = Uuid::new_v4().to_string();
    let result = sqlx::query(
        "INSERT INTO users (uuid, name, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(&uuid)
    .bind(name)
    .bind(email)
    .bind(&password_hash)
    .bind(Utc::now())
    .execute(&state.db)
    .await?;

    Ok(AuthenticatedUser {
        id: result.last_insert_rowid(),
        uuid,
        name: name.to_string(),
        email: email.to_string(),
    })
}

pub async fn authenticate_user(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<AuthenticatedUser, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, uuid, name, email, password_hash, created_at FROM users WHERE email = ?1",
    )
    .bind(email)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::Unauthorized)?;

    let parsed = PasswordHash::new(&user.password_hash)
        .map_err(|err| AppError::Other(anyhow::anyhow!("stored hash unreadable: {err}")))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AppError::Unauthorized)?;

    Ok(user.into())
}

pub async fn create_session(state: &AppState, user_id: i64) -> Result<String, AppError> {
    let session_id = Uuid::new_v4().to_string();
    let now = Utc::now();
    sqlx::query("INSERT INTO sessions (id, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)")
        .bind(&session_id)
        .bind(user_id)
        .bind(now)
        .bind(now + Duration::days(SESSION_TTL_DAYS))
        .execute(&state.db)
        .await?;
    Ok(session_id)
}

pub async fn destroy_session(state: &AppState, session_id: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sessions WHERE id = ?1")
        .bind(session_id)
        .execute(&state.db)
        .await?;
    Ok(())
}

/// Resolves the session cookie to a user. This is the per-request analogue
/// of an auth-state subscription: each flow asks for the session explicitly
/// and nothing holds auth state between requests.
pub async fn session_user(
    state: &AppState,
    jar: &PrivateCookieJar,
) -> Result<Option<AuthenticatedUser>, AppError> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };

    let session = sqlx::query_as::<_, Session>(
        "SELECT id, user_id, created_at, expires_at FROM sessions WHERE id = ?1",
    )
    .bind(cookie.value())
    .fetch_optional(&state.db)
    .await?;

    let Some(session) = session else {
        return Ok(None);
    };
    if let Some(expires_at) = session.expires_at {
        if expires_at <= Utc::now() {
            return Ok(None);
        }
    }

    let user = sqlx::query_as::<_, User>(
        "SELECT id, uuid, name, email, password_hash, created_at FROM users WHERE id = ?1",
    )
    .bind(session.user_id)
    .fetch_optional(&state.db)
    .await?;

    Ok(user.map(AuthenticatedUser::from))
}

pub fn apply_session_cookie(jar: PrivateCookieJar, session_id: &str) -> PrivateCookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .path("/")
        .http_only(true)
        .build();
    jar.add(cookie)
}

pub fn clear_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    jar.remove(cookie)
}
