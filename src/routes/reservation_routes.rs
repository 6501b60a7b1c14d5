use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::post,
    Json, Router,
};

use crate::dto::reservation_dto::{CreateExternalReservationRequest, CreateExternalReservationResponse};
use crate::middleware::api_key::api_key_middleware;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas bajo `/api/reservations`; todas exigen API key
pub fn create_reservation_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/external", post(create_external_reservation))
        .route_layer(from_fn_with_state(state, api_key_middleware))
}

async fn create_external_reservation(
    State(state): State<AppState>,
    payload: Result<Json<CreateExternalReservationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateExternalReservationResponse>), AppError> {
    let result = match payload {
        Ok(Json(request)) => {
            state
                .reservation_service
                .create_external_reservation(request)
                .await
        }
        Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
    };

    let reservation_id = result.map_err(|e| {
        tracing::error!("Error creating external reservation: {}", e);
        e
    })?;

    Ok((
        StatusCode::CREATED,
        Json(CreateExternalReservationResponse::created(reservation_id)),
    ))
}
