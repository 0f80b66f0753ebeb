//! Services module - Coordinatore per tutti i service handler HTTP
//!
//! Ogni modulo gestisce gli endpoint HTTP per una specifica funzionalità.

pub mod auth;
pub mod rsvp;

// Re-exports per facilitare l'import
pub use auth::{login_user, logout_user, me, register_user};
pub use rsvp::{
    cancel_rsvp, create_rsvp, get_event_rsvp_count, get_user_rsvp_for_event, get_user_rsvps,
    update_rsvp,
};

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
