//! Entities module - Entità del dominio applicativo
//!
//! Questo modulo contiene tutte le entità che rappresentano i dati persistiti nel database.
//! Ogni entity corrisponde a una tabella nel database.

pub mod rsvp;
pub mod user;

// Re-exports per facilitare l'import
pub use rsvp::{MAX_GUESTS, MIN_GUESTS, Rsvp};
pub use user::User;
