//! Core Module - Componenti infrastrutturali dell'applicazione
//!
//! Questo modulo contiene tutti i componenti "core" dell'applicazione:
//! - Autenticazione, JWT e risoluzione dell'identità
//! - Configurazione
//! - Gestione errori
//! - Stato applicazione

pub mod auth;
pub mod config;
pub mod error;
pub mod state;

// Re-exports per facilitare l'import
pub use auth::{Caller, Claims, Identity, decode_jwt, encode_jwt, identity_middleware};
pub use config::Config;
pub use error::AppError;
pub use state::AppState;
