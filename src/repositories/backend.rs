//! RsvpBackend - Selezione dello store delle prenotazioni
//!
//! Lo store viene scelto una sola volta all'avvio (`RSVP_STORE`) e il resto
//! dell'applicazione lavora solo con [`RsvpStore`].

use super::{
    Create, Delete, MemoryRsvpStore, Read, RepositoryError, RsvpRepository, RsvpStore, Update,
};
use crate::dtos::{CreateRsvpDTO, UpdateRsvpDTO};
use crate::entities::Rsvp;
use sqlx::MySqlPool;
use std::str::FromStr;

/// Tipo di store configurato
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpStoreKind {
    MySql,
    Memory,
}

impl FromStr for RsvpStoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(Self::MySql),
            "memory" => Ok(Self::Memory),
            other => Err(format!(
                "Invalid RSVP_STORE '{}': expected 'mysql' or 'memory'",
                other
            )),
        }
    }
}

/// Store delle prenotazioni effettivamente in uso
#[derive(Clone)]
pub enum RsvpBackend {
    /// Tabella `rsvps` su MySQL
    MySql(RsvpRepository),
    /// Store in memoria (sviluppo e test)
    Memory(MemoryRsvpStore),
}

impl RsvpBackend {
    /// Costruisce lo store richiesto; il pool viene usato solo per MySQL
    pub fn new(kind: RsvpStoreKind, pool: MySqlPool) -> Self {
        match kind {
            RsvpStoreKind::MySql => Self::MySql(RsvpRepository::new(pool)),
            RsvpStoreKind::Memory => Self::Memory(MemoryRsvpStore::new()),
        }
    }
}

impl RsvpStore for RsvpBackend {
    async fn find_by_user_and_event(
        &self,
        user_id: &i32,
        event_id: &str,
    ) -> Result<Option<Rsvp>, RepositoryError> {
        match self {
            Self::MySql(repo) => repo.find_by_user_and_event(user_id, event_id).await,
            Self::Memory(store) => store.find_by_user_and_event(user_id, event_id).await,
        }
    }

    async fn find_many_by_user_id(&self, user_id: &i32) -> Result<Vec<Rsvp>, RepositoryError> {
        match self {
            Self::MySql(repo) => repo.find_many_by_user_id(user_id).await,
            Self::Memory(store) => store.find_many_by_user_id(user_id).await,
        }
    }

    async fn find_many_by_event_id(&self, event_id: &str) -> Result<Vec<Rsvp>, RepositoryError> {
        match self {
            Self::MySql(repo) => repo.find_many_by_event_id(event_id).await,
            Self::Memory(store) => store.find_many_by_event_id(event_id).await,
        }
    }
}

impl Create<Rsvp, CreateRsvpDTO> for RsvpBackend {
    async fn create(&self, data: &CreateRsvpDTO) -> Result<Rsvp, RepositoryError> {
        match self {
            Self::MySql(repo) => repo.create(data).await,
            Self::Memory(store) => store.create(data).await,
        }
    }
}

impl Read<Rsvp, i32> for RsvpBackend {
    async fn read(&self, id: &i32) -> Result<Option<Rsvp>, RepositoryError> {
        match self {
            Self::MySql(repo) => repo.read(id).await,
            Self::Memory(store) => store.read(id).await,
        }
    }
}

impl Update<Rsvp, UpdateRsvpDTO, i32> for RsvpBackend {
    async fn update(&self, id: &i32, data: &UpdateRsvpDTO) -> Result<Option<Rsvp>, RepositoryError> {
        match self {
            Self::MySql(repo) => repo.update(id, data).await,
            Self::Memory(store) => store.update(id, data).await,
        }
    }
}

impl Delete<i32> for RsvpBackend {
    async fn delete(&self, id: &i32) -> Result<bool, RepositoryError> {
        match self {
            Self::MySql(repo) => repo.delete(id).await,
            Self::Memory(store) => store.delete(id).await,
        }
    }
}
