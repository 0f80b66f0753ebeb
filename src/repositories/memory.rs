//! MemoryRsvpStore - Store delle prenotazioni in memoria
//!
//! Implementazione di riferimento di [`RsvpStore`], usata in sviluppo
//! (`RSVP_STORE=memory`) e nei test che non devono dipendere da MySQL.
//! Controllo dei duplicati e inserimento avvengono sotto lo stesso lock,
//! quindi l'unicità di `(user_id, event_id)` vale anche con insert concorrenti.

use super::rsvp::RSVP_UNIQUE_KEY;
use super::{Create, Delete, Read, RepositoryError, RsvpStore, Update};
use crate::dtos::{CreateRsvpDTO, UpdateRsvpDTO};
use crate::entities::Rsvp;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
struct RsvpTable {
    rows: BTreeMap<i32, Rsvp>,
    last_id: i32,
}

#[derive(Clone, Default)]
pub struct MemoryRsvpStore {
    table: Arc<Mutex<RsvpTable>>,
}

impl MemoryRsvpStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RsvpStore for MemoryRsvpStore {
    async fn find_by_user_and_event(
        &self,
        user_id: &i32,
        event_id: &str,
    ) -> Result<Option<Rsvp>, RepositoryError> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .find(|r| r.user_id == *user_id && r.event_id == event_id)
            .cloned())
    }

    async fn find_many_by_user_id(&self, user_id: &i32) -> Result<Vec<Rsvp>, RepositoryError> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .filter(|r| r.user_id == *user_id)
            .cloned()
            .collect())
    }

    async fn find_many_by_event_id(&self, event_id: &str) -> Result<Vec<Rsvp>, RepositoryError> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect())
    }
}

impl Create<Rsvp, CreateRsvpDTO> for MemoryRsvpStore {
    async fn create(&self, data: &CreateRsvpDTO) -> Result<Rsvp, RepositoryError> {
        let mut table = self.table.lock().await;

        if table
            .rows
            .values()
            .any(|r| r.user_id == data.user_id && r.event_id == data.event_id)
        {
            return Err(RepositoryError::UniqueViolation(RSVP_UNIQUE_KEY));
        }

        table.last_id += 1;
        let rsvp = Rsvp {
            rsvp_id: table.last_id,
            user_id: data.user_id,
            event_id: data.event_id.clone(),
            guests: data.guests,
            notes: data.notes.clone(),
            created_at: data.created_at,
        };
        table.rows.insert(rsvp.rsvp_id, rsvp.clone());

        Ok(rsvp)
    }
}

impl Read<Rsvp, i32> for MemoryRsvpStore {
    async fn read(&self, id: &i32) -> Result<Option<Rsvp>, RepositoryError> {
        Ok(self.table.lock().await.rows.get(id).cloned())
    }
}

impl Update<Rsvp, UpdateRsvpDTO, i32> for MemoryRsvpStore {
    async fn update(&self, id: &i32, data: &UpdateRsvpDTO) -> Result<Option<Rsvp>, RepositoryError> {
        let mut table = self.table.lock().await;
        let Some(rsvp) = table.rows.get_mut(id) else {
            return Ok(None);
        };

        if let Some(guests) = data.guests {
            rsvp.guests = guests;
        }
        if let Some(ref notes) = data.notes {
            rsvp.notes = notes.clone();
        }

        Ok(Some(rsvp.clone()))
    }
}

impl Delete<i32> for MemoryRsvpStore {
    async fn delete(&self, id: &i32) -> Result<bool, RepositoryError> {
        Ok(self.table.lock().await.rows.remove(id).is_some())
    }
}
