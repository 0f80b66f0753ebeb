//! Auth services - Gestione autenticazione e registrazione dei membri

use crate::core::auth::{expired_session_cookie, session_cookie};
use crate::core::{AppError, AppState, Caller, encode_jwt};
use crate::dtos::{CreateUserDTO, LoginDTO, RegisterUserDTO, UserDTO};
use crate::entities::User;
use crate::repositories::{Create, Read, RepositoryError};
use axum::{
    Extension,
    extract::{Json, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use axum_macros::debug_handler;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

fn header_value(value: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(value)
        .map_err(|_| AppError::internal_server_error("Failed to build response headers"))
}

#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginDTO>, // JSON body
) -> Result<impl IntoResponse, AppError> {
    // 1. Cercare il membro tramite email, se non esiste UNAUTHORIZED
    // 2. Verificare la password contro l'hash memorizzato, altrimenti UNAUTHORIZED
    // 3. Generare il token JWT
    // 4. Restituire il token sia come cookie HttpOnly (client web) sia come
    //    header Authorization (client nativi, che lo salvano nello storage sicuro)
    debug!("Login attempt");

    let user = match state.user.find_by_email(&body.email).await? {
        Some(user) => user,
        None => {
            warn!("Login for unknown email");
            return Err(AppError::unauthorized("Email or password are not correct."));
        }
    };

    if !user.verify_password(&body.password) {
        warn!("Wrong password for user {}", user.user_id);
        return Err(AppError::unauthorized("Email or password are not correct."));
    }

    let token = encode_jwt(user.email, user.user_id, &state.jwt_secret)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        header_value(&session_cookie(&token, &state.cookie_same_site))?,
    );
    headers.insert(
        header::AUTHORIZATION,
        header_value(&format!("Bearer {}", token))?,
    );

    info!("User {} logged in", user.user_id);
    Ok((StatusCode::OK, headers))
}

#[debug_handler]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterUserDTO>, // JSON body
) -> Result<Json<UserDTO>, AppError> {
    // 1. Validare il DTO (formato email, lunghezza password e nome)
    // 2. Se l'email è già registrata, CONFLICT
    // 3. Salvare il membro con la password hashata
    debug!("Registering new member");
    body.validate()?;

    if state.user.find_by_email(&body.email).await?.is_some() {
        warn!("Email already registered");
        return Err(AppError::conflict("Email already registered"));
    }

    let password_hash = User::hash_password(&body.password)
        .map_err(|_| AppError::internal_server_error("Failed to hash password"))?;

    let new_user = CreateUserDTO {
        email: body.email,
        display_name: body.display_name,
        password: password_hash,
    };

    // due registrazioni concorrenti con la stessa email: vince il vincolo univoco
    let created_user = state.user.create(&new_user).await.map_err(|e| match e {
        RepositoryError::UniqueViolation(_) => AppError::conflict("Email already registered"),
        other => other.into(),
    })?;

    info!("Registered user {}", created_user.user_id);
    Ok(Json(UserDTO::from(created_user)))
}

#[instrument(skip(state))]
pub async fn logout_user(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        header_value(&expired_session_cookie(&state.cookie_same_site))?,
    );
    Ok((StatusCode::OK, headers))
}

#[instrument(skip(state, caller))]
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<UserDTO>, AppError> {
    let identity = caller.require()?;

    // token valido ma account non più presente
    let user = state
        .user
        .read(&identity.user_id)
        .await?
        .ok_or_else(|| AppError::unauthorized("You are not an authorized user"))?;

    Ok(Json(UserDTO::from(user)))
}
