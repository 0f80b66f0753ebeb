use crate::core::{AppError, AppState};
use axum::extract::State;
use axum::{Error, body::Body, extract::Request, http, http::HeaderMap, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Nome del cookie di sessione usato dai client web
pub const SESSION_COOKIE: &str = "token";

/// Durata della sessione (token e cookie)
pub const SESSION_HOURS: i64 = 24;

// struct che codifica il contenuto del token jwt
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize, // Expiry time of the token
    pub iat: usize, // Issued at time of the token
    pub id: i32,
    pub email: String,
}

#[instrument(skip(secret), fields(email = %email, id = %id))]
pub fn encode_jwt(email: String, id: i32, secret: &str) -> Result<String, Error> {
    debug!("Encoding JWT token for user");
    let now = Utc::now();
    let expire: chrono::TimeDelta = Duration::hours(SESSION_HOURS);
    let exp: usize = (now + expire).timestamp() as usize;
    let iat: usize = now.timestamp() as usize;
    let claim = Claims { iat, exp, email, id };

    encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map(|token| {
        info!("JWT token encoded successfully");
        token
    })
    .map_err(|e| {
        error!("Failed to encode JWT token: {:?}", e);
        Error::new("Error in encoding jwt token")
    })
}

#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(jwt_token: &str, secret: &str) -> Result<TokenData<Claims>, Error> {
    decode(
        jwt_token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| {
        warn!("Failed to decode JWT token: {:?}", e);
        Error::new("Error in decoding jwt token")
    })
}

/// Identità autenticata del chiamante, ricavata dal token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i32,
    pub email: String,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.id,
            email: claims.email,
        }
    }
}

/// Piattaforma dei client serviti, decide da dove leggere il token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPlatform {
    /// Browser: token nel cookie HttpOnly `token`
    Web,
    /// App native: token nello storage sicuro, inviato come `Authorization: Bearer`
    Native,
}

impl FromStr for AuthPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "web" => Ok(Self::Web),
            "native" => Ok(Self::Native),
            other => Err(format!(
                "Invalid AUTH_PLATFORM '{}': expected 'web' or 'native'",
                other
            )),
        }
    }
}

impl fmt::Display for AuthPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Web => write!(f, "web"),
            Self::Native => write!(f, "native"),
        }
    }
}

/// Risolve l'identità corrente a partire dalla richiesta.
///
/// Credenziali assenti, scadute o malformate danno `None`: un chiamante
/// anonimo non è mai un errore a questo livello.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Option<Identity>;
}

/// Token letto dal cookie di sessione (client web)
pub struct CookieIdentityResolver {
    secret: String,
}

impl CookieIdentityResolver {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }
}

impl IdentityResolver for CookieIdentityResolver {
    fn resolve(&self, headers: &HeaderMap) -> Option<Identity> {
        let token = headers
            .get_all(http::header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .map(|(_, token)| token)?;

        if token.is_empty() {
            return None;
        }
        decode_jwt(token, &self.secret).ok().map(|data| data.claims.into())
    }
}

/// Token letto dall'header `Authorization: Bearer` (client nativi)
pub struct BearerIdentityResolver {
    secret: String,
}

impl BearerIdentityResolver {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }
}

impl IdentityResolver for BearerIdentityResolver {
    fn resolve(&self, headers: &HeaderMap) -> Option<Identity> {
        let auth_header = headers.get(http::header::AUTHORIZATION)?.to_str().ok()?;
        let mut header = auth_header.split_whitespace();
        let (scheme, token) = (header.next()?, header.next()?);
        if !scheme.eq_ignore_ascii_case("bearer") {
            debug!("Unsupported authorization scheme: {}", scheme);
            return None;
        }
        decode_jwt(token, &self.secret).ok().map(|data| data.claims.into())
    }
}

/// Sceglie il resolver una volta sola, all'avvio
pub fn identity_resolver(platform: AuthPlatform, secret: String) -> Arc<dyn IdentityResolver> {
    match platform {
        AuthPlatform::Web => Arc::new(CookieIdentityResolver::new(secret)),
        AuthPlatform::Native => Arc::new(BearerIdentityResolver::new(secret)),
    }
}

/// Chiamante della richiesta corrente, inserito nelle Extension da [`identity_middleware`]
#[derive(Debug, Clone, Default)]
pub struct Caller(pub Option<Identity>);

impl Caller {
    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }

    /// Per gli endpoint che non ammettono chiamanti anonimi
    pub fn require(&self) -> Result<&Identity, AppError> {
        self.identity()
            .ok_or_else(|| AppError::unauthorized("You are not signed in").with_code("UNAUTHORIZED"))
    }
}

/// Middleware che risolve l'identità e la inserisce come [`Caller`] nelle Extension.
/// Non rifiuta mai la richiesta: sono gli handler a decidere se l'anonimato è un errore.
#[instrument(skip(state, req, next))]
pub async fn identity_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response<Body> {
    let identity = state.identity.resolve(req.headers());
    match &identity {
        Some(identity) => debug!("Request from user {}", identity.user_id),
        None => debug!("Anonymous request"),
    }
    req.extensions_mut().insert(Caller(identity));
    next.run(req).await
}

/// Cookie di sessione impostato al login
pub fn session_cookie(token: &str, same_site: &str) -> String {
    format!(
        "{}={}; HttpOnly; Secure; SameSite={}; Path=/; Max-Age={}",
        SESSION_COOKIE,
        token,
        same_site,
        SESSION_HOURS * 60 * 60
    )
}

/// Cookie con Max-Age=0 per forzare il logout lato client
pub fn expired_session_cookie(same_site: &str) -> String {
    format!(
        "{}=; HttpOnly; Secure; SameSite={}; Path=/; Max-Age=0",
        SESSION_COOKIE, same_site
    )
}
