//! Repositories module - Coordinatore per tutti i repository del progetto
//!
//! Ogni repository gestisce le operazioni di persistenza per una specifica entità.
//!
//! Le query usano `sqlx::query` / `sqlx::query_as` con `FromRow`: le macro `query!`
//! richiedono un database raggiungibile in fase di compilazione.

pub mod backend;
pub mod memory;
pub mod rsvp;
pub mod traits;
pub mod user;

// Re-esportazione dei trait per facilitare l'import
pub use traits::{Create, Delete, Read, RepositoryError, RsvpStore, Update};

// Re-esportazione delle struct dei repository per facilitare l'import
pub use backend::{RsvpBackend, RsvpStoreKind};
pub use memory::MemoryRsvpStore;
pub use rsvp::RsvpRepository;
pub use user::UserRepository;
