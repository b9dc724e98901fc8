use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use super::dto::MessageResponse;
use super::{intake, services};
use crate::{error::AppError, state::AppState};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/view-registrations", get(view_registrations))
}

pub fn write_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

pub async fn home(State(state): State<AppState>) -> String {
    state.config.banner.clone()
}

/// POST /register (multipart)
#[instrument(skip(state, mp))]
pub async fn register(
    State(state): State<AppState>,
    mp: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let mut mp = match mp {
        Ok(mp) => mp,
        Err(rejection) => {
            warn!(%rejection, "request is not multipart");
            return Err(AppError::MissingFieldOrFile(state.schema.missing_message));
        }
    };

    let form = match intake::collect(&mut mp).await {
        Ok(f) => f,
        Err(e) => {
            warn!(error = %e, status = %e.status(), "unreadable multipart body");
            return Err(e);
        }
    };
    let form = match form.validate(state.schema) {
        Ok(f) => f,
        Err(e) => {
            warn!(error = %e, "missing fields or files");
            return Err(e);
        }
    };
    info!(
        name = %form.name,
        university = %form.university,
        email = %form.email,
        images = form.attachments.len(),
        "received registration"
    );

    let receipt = services::persist_registration(&state, form).await?;
    info!(
        paths = ?receipt.stored_paths,
        timestamp = %receipt.timestamp,
        total_rows = receipt.total_rows,
        "registration saved"
    );

    Ok(Json(MessageResponse {
        message: "Registration successful!".into(),
    }))
}

#[instrument(skip(state))]
pub async fn view_registrations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Map<String, Value>>>, AppError> {
    let records = services::list_registrations(&state).await?;
    Ok(Json(records))
}
