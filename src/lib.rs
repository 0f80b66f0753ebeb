//! Clubhouse server library - espone i moduli principali per i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod managers;
pub mod repositories;
pub mod services;

// Re-export dei tipi principali per facilitare l'import
pub use crate::core::{AppError, AppState, auth, config};
pub use services::root;

use axum::http::{HeaderValue, Method, header};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    use crate::core::identity_middleware;

    Router::new()
        .route("/", get(root))
        .nest("/auth", configure_auth_routes())
        .nest("/events", configure_event_routes())
        .nest("/rsvps", configure_rsvp_routes())
        // ogni richiesta riceve un Caller, eventualmente anonimo
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ))
        .with_state(state)
}

/// Configura le routes di autenticazione
fn configure_auth_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/login", post(login_user))
        .route("/register", post(register_user))
        .route("/logout", post(logout_user))
        .route("/me", get(me))
}

/// Configura le routes delle prenotazioni legate a un evento
fn configure_event_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route(
            "/{event_id}/rsvp",
            get(get_user_rsvp_for_event)
                .post(create_rsvp)
                .patch(update_rsvp)
                .delete(cancel_rsvp),
        )
        .route("/{event_id}/rsvps/count", get(get_event_rsvp_count))
}

/// Configura le routes delle prenotazioni del membro corrente
fn configure_rsvp_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new().route("/me", get(get_user_rsvps))
}

/// CORS per i client web.
///
/// Con origini esplicite le credenziali (cookie di sessione) sono ammesse
/// anche cross-domain; senza origini configurate qualsiasi origine è
/// accettata ma senza credenziali.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers([header::AUTHORIZATION]);
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([header::AUTHORIZATION])
}
