use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    auth,
    error::{AppError, FieldError},
    state::AppState,
    validators::{email_validator, password_validator},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(welcome))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

async fn welcome() -> &'static str {
    "Welcome to BlueWave Cleanup API!"
}

#[derive(Serialize)]
struct SessionBody {
    uid: String,
    name: String,
    email: String,
}

#[derive(Deserialize)]
struct RegisterBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

async fn register(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, AppError> {
    let user = auth::register_user(&state, &body.name, &body.email, &body.password).await?;
    let session_id = auth::create_session(&state, user.id).await?;
    Ok((
        StatusCode::CREATED,
        auth::apply_session_cookie(jar, &session_id),
        Json(SessionBody {
            uid: user.uuid,
            name: user.name,
            email: user.email,
        }),
    ))
}

#[derive(Deserialize)]
struct LoginBody {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, AppError> {
    // Field validation runs before the credentials ever reach the database.
    let mut errors = Vec::new();
    if let Some(message) = email_validator(&body.email) {
        errors.push(FieldError::new("email", message));
    }
    if let Some(message) = password_validator(&body.password) {
        errors.push(FieldError::new("password", message));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let user = auth::authenticate_user(&state, &body.email, &body.password).await?;
    let session_id = auth::create_session(&state, user.id).await?;
    Ok((
        auth::apply_session_cookie(jar, &session_id),
        Json(SessionBody {
            uid: user.uuid,
            name: user.name,
            email: user.email,
        }),
    ))
}

async fn logout(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> Result<impl IntoResponse, AppError> {
    if let Some(cookie) = jar.get(auth::SESSION_COOKIE) {
        auth::destroy_session(&state, cookie.value()).await?;
    }
    Ok((auth::clear_session_cookie(jar), StatusCode::NO_CONTENT))
}
