use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Serialize;
use tracing::info;

use crate::{
    auth::{self, CurrentUser},
    creation::TripForm,
    directory::TripFilter,
    error::{AppError, FieldError},
    models::trip::Trip,
    services::trips::TripGateway,
    signup::{self, SignupFlow},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trips).post(create_trip))
        .route("/:id", get(trip_detail))
        .route("/:id/signup", post(sign_up))
}

#[derive(Serialize)]
struct TripListing {
    total: usize,
    trips: Vec<Trip>,
}

/// Every listing request re-fetches the full snapshot; there is no cache
/// between requests. A failed fetch is an error response, never an empty
/// list.
async fn list_trips(
    State(state): State<AppState>,
    Query(filter): Query<TripFilter>,
) -> Result<Json<TripListing>, AppError> {
    let all_trips = state.trips.list_trips().await?;
    let visible = filter.apply(&all_trips);
    Ok(Json(TripListing {
        total: all_trips.len(),
        trips: visible,
    }))
}

/// The detail view resolves its two inputs concurrently; the signup flow
/// tolerates either one landing first.
async fn trip_detail(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut flow = SignupFlow::default();

    let (session, trip) = tokio::join!(
        auth::session_user(&state, &jar),
        state.trips.get_trip(&id),
    );
    flow.auth_resolved(session?);
    flow.trip_resolved(trip?);

    let view = flow
        .view()
        .ok_or_else(|| AppError::Other(anyhow::anyhow!("detail flow left unresolved")))?;
    Ok(Json(view))
}

async fn sign_up(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Trip>, AppError> {
    let user = current.require_user()?;
    let trip = state.trips.get_trip(&id).await?;
    let updated = signup::join_trip(&state.trips, &trip, user).await?;
    info!(trip_id = %updated.id, user = %user.uuid, "participant signed up");
    Ok(Json(updated))
}

#[derive(Serialize)]
struct CreatedTrip {
    id: String,
}

#[derive(Serialize)]
struct RejectedForm {
    errors: Vec<FieldError>,
    form: TripForm,
}

/// On validation failure the typed values are echoed back next to the field
/// errors so the form can be re-entered without data loss.
async fn create_trip(
    State(state): State<AppState>,
    Json(form): Json<TripForm>,
) -> Result<impl IntoResponse, AppError> {
    match form.validate() {
        Ok(draft) => {
            let id = state.trips.create_trip(draft).await?;
            info!(trip_id = %id, "trip created");
            Ok((StatusCode::CREATED, Json(CreatedTrip { id })).into_response())
        }
        Err(errors) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(RejectedForm { errors, form }),
        )
            .into_response()),
    }
}
