//! Application State - Stato globale dell'applicazione
//!
//! Contiene i repository, il manager delle prenotazioni e il resolver
//! dell'identità scelto per la piattaforma dei client.

use crate::core::Config;
use crate::core::auth::{AuthPlatform, IdentityResolver, identity_resolver};
use crate::managers::RsvpManager;
use crate::repositories::{RsvpBackend, UserRepository};
use sqlx::MySqlPool;
use std::sync::Arc;

/// Stato globale dell'applicazione condiviso tra tutte le route e middleware
pub struct AppState {
    /// Repository per la gestione dei membri
    pub user: UserRepository,

    /// Regole e store delle prenotazioni
    pub rsvp: RsvpManager<RsvpBackend>,

    /// Resolver dell'identità (cookie per il web, bearer per le app native)
    pub identity: Arc<dyn IdentityResolver>,

    /// Secret key per JWT token
    pub jwt_secret: String,

    /// Attributo SameSite del cookie di sessione
    pub cookie_same_site: String,
}

impl AppState {
    /// Crea una nuova istanza di AppState.
    ///
    /// # Arguments
    /// * `pool` - Pool di connessioni MySQL condiviso
    /// * `rsvp_store` - Store delle prenotazioni già selezionato
    /// * `platform` - Piattaforma dei client, decide il resolver dell'identità
    /// * `jwt_secret` - Chiave segreta per la firma dei token JWT
    pub fn new(
        pool: MySqlPool,
        rsvp_store: RsvpBackend,
        platform: AuthPlatform,
        jwt_secret: String,
    ) -> Self {
        Self {
            user: UserRepository::new(pool),
            rsvp: RsvpManager::new(rsvp_store),
            identity: identity_resolver(platform, jwt_secret.clone()),
            jwt_secret,
            cookie_same_site: "Lax".to_string(),
        }
    }

    /// Costruisce lo stato a partire dalla configurazione caricata all'avvio
    pub fn from_config(pool: MySqlPool, config: &Config) -> Self {
        let rsvp_store = RsvpBackend::new(config.rsvp_store, pool.clone());
        let mut state = Self::new(
            pool,
            rsvp_store,
            config.auth_platform,
            config.jwt_secret.clone(),
        );
        state.cookie_same_site = config.cookie_same_site.clone();
        state
    }
}
