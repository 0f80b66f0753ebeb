//! Rsvp services - Endpoint HTTP delle prenotazioni agli eventi
//!
//! Le letture con chiamante anonimo restituiscono risultati vuoti, le
//! scritture rispondono 401. Tutte le regole stanno in [`crate::managers::RsvpManager`].

use crate::core::{AppError, AppState, Caller};
use crate::dtos::{
    CreateRsvpRequestDTO, EventRsvpCountDTO, RsvpAckDTO, RsvpDTO, UpdateRsvpRequestDTO,
};
use axum::{
    Extension,
    extract::{Json, Path, State},
};
use std::sync::Arc;
use tracing::{debug, instrument};

#[instrument(skip(state, caller), fields(event_id = %event_id))]
pub async fn get_user_rsvp_for_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>, // parametro dalla URL /events/{event_id}/rsvp
    Extension(caller): Extension<Caller>, // inserito da identity_middleware
) -> Result<Json<Option<RsvpDTO>>, AppError> {
    let rsvp = state
        .rsvp
        .get_user_rsvp_for_event(caller.identity(), &event_id)
        .await?;
    debug!("RSVP found: {}", rsvp.is_some());
    Ok(Json(rsvp.map(RsvpDTO::from)))
}

#[instrument(skip(state, caller))]
pub async fn get_user_rsvps(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<RsvpDTO>>, AppError> {
    let rsvps = state.rsvp.get_user_rsvps(caller.identity()).await?;
    Ok(Json(rsvps.into_iter().map(RsvpDTO::from).collect()))
}

#[instrument(skip(state), fields(event_id = %event_id))]
pub async fn get_event_rsvp_count(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<Json<EventRsvpCountDTO>, AppError> {
    Ok(Json(state.rsvp.get_event_rsvp_count(&event_id).await?))
}

#[instrument(skip(state, caller, body), fields(event_id = %event_id, guests = body.guests))]
pub async fn create_rsvp(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<CreateRsvpRequestDTO>,
) -> Result<Json<RsvpAckDTO>, AppError> {
    let rsvp = state
        .rsvp
        .create_rsvp(caller.identity(), &event_id, body.guests, body.notes)
        .await?;
    Ok(Json(RsvpAckDTO {
        id: rsvp.rsvp_id,
        success: true,
    }))
}

#[instrument(skip(state, caller, body), fields(event_id = %event_id, guests = body.guests))]
pub async fn update_rsvp(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<UpdateRsvpRequestDTO>,
) -> Result<Json<RsvpAckDTO>, AppError> {
    let rsvp = state
        .rsvp
        .update_rsvp(caller.identity(), &event_id, body.guests, body.notes)
        .await?;
    Ok(Json(RsvpAckDTO {
        id: rsvp.rsvp_id,
        success: true,
    }))
}

#[instrument(skip(state, caller), fields(event_id = %event_id))]
pub async fn cancel_rsvp(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<RsvpAckDTO>, AppError> {
    let rsvp_id = state.rsvp.cancel_rsvp(caller.identity(), &event_id).await?;
    Ok(Json(RsvpAckDTO {
        id: rsvp_id,
        success: true,
    }))
}
