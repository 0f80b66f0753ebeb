//! RsvpManager - Regole di dominio delle prenotazioni agli eventi
//!
//! Garantisce al massimo una prenotazione per coppia `(utente, evento)` e
//! valida il numero di partecipanti. Non conosce HTTP: riceve l'identità già
//! risolta (o `None` per un chiamante anonimo) e lavora su qualsiasi [`RsvpStore`].
//!
//! Stati per coppia `(utente, evento)`:
//! `ABSENT --create--> PRESENT --update--> PRESENT --cancel--> ABSENT`

use crate::core::auth::Identity;
use crate::dtos::{CreateRsvpDTO, EventRsvpCountDTO, UpdateRsvpDTO};
use crate::entities::Rsvp;
use crate::repositories::{RepositoryError, RsvpStore};
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

/// Lunghezza massima di un event id (colonna `event_id VARCHAR(64)`)
pub const MAX_EVENT_ID_LEN: usize = 64;

/// Errori delle operazioni sulle prenotazioni.
///
/// Ogni variante è una condizione distinta per il client: non vanno
/// collassate in un errore generico.
#[derive(Debug, thiserror::Error)]
pub enum RsvpError {
    #[error("You must be signed in to RSVP")]
    Unauthorized,

    #[error("Event id must be between 1 and 64 characters")]
    InvalidEventId,

    #[error("You have already RSVP'd to this event")]
    DuplicateRsvp,

    #[error("No RSVP found for this event")]
    RsvpNotFound,

    #[error("Guests must be between 1 and 10")]
    InvalidGuestCount,

    #[error("RSVP store failure: {0}")]
    Store(RepositoryError),
}

impl From<RepositoryError> for RsvpError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // l'insert perdente di una corsa arriva qui
            RepositoryError::UniqueViolation(_) => Self::DuplicateRsvp,
            // token ancora valido per un account eliminato
            RepositoryError::ForeignKeyViolation(_) => Self::Unauthorized,
            other => Self::Store(other),
        }
    }
}

fn is_valid_event_id(event_id: &str) -> bool {
    !event_id.is_empty() && event_id.chars().count() <= MAX_EVENT_ID_LEN
}

/// Valida il numero di partecipanti e solo dopo lo restringe a `i32`
fn checked_guest_count(guests: i64) -> Result<i32, RsvpError> {
    if !Rsvp::is_valid_guest_count(guests) {
        warn!("Rejected guest count {}", guests);
        return Err(RsvpError::InvalidGuestCount);
    }
    i32::try_from(guests).map_err(|_| RsvpError::InvalidGuestCount)
}

/// `created_at` è persistito al millisecondo
fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

pub struct RsvpManager<S> {
    store: S,
}

impl<S: RsvpStore> RsvpManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Prenotazione del chiamante per l'evento.
    ///
    /// Un chiamante anonimo riceve `None` e non un errore.
    #[instrument(skip(self, caller), fields(user_id = ?caller.map(|c| c.user_id)))]
    pub async fn get_user_rsvp_for_event(
        &self,
        caller: Option<&Identity>,
        event_id: &str,
    ) -> Result<Option<Rsvp>, RsvpError> {
        let Some(caller) = caller else {
            debug!("Anonymous caller, no RSVP");
            return Ok(None);
        };
        if !is_valid_event_id(event_id) {
            return Ok(None);
        }

        Ok(self
            .store
            .find_by_user_and_event(&caller.user_id, event_id)
            .await?)
    }

    /// Tutte le prenotazioni del chiamante, senza ordinamento garantito.
    #[instrument(skip(self, caller), fields(user_id = ?caller.map(|c| c.user_id)))]
    pub async fn get_user_rsvps(&self, caller: Option<&Identity>) -> Result<Vec<Rsvp>, RsvpError> {
        let Some(caller) = caller else {
            debug!("Anonymous caller, no RSVPs");
            return Ok(Vec::new());
        };

        let rsvps = self.store.find_many_by_user_id(&caller.user_id).await?;
        debug!("Found {} RSVPs", rsvps.len());
        Ok(rsvps)
    }

    /// Aggregato pubblico: numero di prenotazioni e somma dei partecipanti.
    #[instrument(skip(self))]
    pub async fn get_event_rsvp_count(&self, event_id: &str) -> Result<EventRsvpCountDTO, RsvpError> {
        if !is_valid_event_id(event_id) {
            return Ok(EventRsvpCountDTO::default());
        }

        let rsvps = self.store.find_many_by_event_id(event_id).await?;
        Ok(EventRsvpCountDTO::from_rsvps(&rsvps))
    }

    /// Crea la prenotazione del chiamante.
    ///
    /// Controlli, nell'ordine: autenticazione, event id, duplicato, numero di
    /// partecipanti. Il controllo sul duplicato è solo un fail-fast: la
    /// garanzia vera è il vincolo di unicità dello store, che trasforma
    /// l'insert perdente di una corsa in [`RsvpError::DuplicateRsvp`].
    #[instrument(skip(self, caller, notes), fields(user_id = ?caller.map(|c| c.user_id)))]
    pub async fn create_rsvp(
        &self,
        caller: Option<&Identity>,
        event_id: &str,
        guests: i64,
        notes: Option<String>,
    ) -> Result<Rsvp, RsvpError> {
        let caller = caller.ok_or(RsvpError::Unauthorized)?;
        if !is_valid_event_id(event_id) {
            return Err(RsvpError::InvalidEventId);
        }

        if self
            .store
            .find_by_user_and_event(&caller.user_id, event_id)
            .await?
            .is_some()
        {
            warn!("User already has an RSVP for this event");
            return Err(RsvpError::DuplicateRsvp);
        }

        let guests = checked_guest_count(guests)?;

        let rsvp = self
            .store
            .create(&CreateRsvpDTO {
                user_id: caller.user_id,
                event_id: event_id.to_string(),
                guests,
                notes,
                created_at: now_millis(),
            })
            .await?;

        info!("Created RSVP {}", rsvp.rsvp_id);
        Ok(rsvp)
    }

    /// Aggiorna `guests` e, se presenti, le note della prenotazione del chiamante.
    ///
    /// `notes`: `None` lascia le note invariate, `Some(None)` le cancella.
    #[instrument(skip(self, caller, notes), fields(user_id = ?caller.map(|c| c.user_id)))]
    pub async fn update_rsvp(
        &self,
        caller: Option<&Identity>,
        event_id: &str,
        guests: i64,
        notes: Option<Option<String>>,
    ) -> Result<Rsvp, RsvpError> {
        let caller = caller.ok_or(RsvpError::Unauthorized)?;
        if !is_valid_event_id(event_id) {
            return Err(RsvpError::InvalidEventId);
        }

        let existing = self
            .store
            .find_by_user_and_event(&caller.user_id, event_id)
            .await?
            .ok_or_else(|| {
                warn!("No RSVP to update");
                RsvpError::RsvpNotFound
            })?;

        let guests = checked_guest_count(guests)?;

        // None: cancellata nel frattempo
        let updated = self
            .store
            .update(
                &existing.rsvp_id,
                &UpdateRsvpDTO {
                    guests: Some(guests),
                    notes,
                },
            )
            .await?
            .ok_or(RsvpError::RsvpNotFound)?;

        info!("Updated RSVP {}", updated.rsvp_id);
        Ok(updated)
    }

    /// Cancella definitivamente la prenotazione del chiamante.
    ///
    /// Restituisce l'id della prenotazione rimossa.
    #[instrument(skip(self, caller), fields(user_id = ?caller.map(|c| c.user_id)))]
    pub async fn cancel_rsvp(
        &self,
        caller: Option<&Identity>,
        event_id: &str,
    ) -> Result<i32, RsvpError> {
        let caller = caller.ok_or(RsvpError::Unauthorized)?;
        if !is_valid_event_id(event_id) {
            return Err(RsvpError::InvalidEventId);
        }

        let existing = self
            .store
            .find_by_user_and_event(&caller.user_id, event_id)
            .await?
            .ok_or_else(|| {
                warn!("No RSVP to cancel");
                RsvpError::RsvpNotFound
            })?;

        if !self.store.delete(&existing.rsvp_id).await? {
            return Err(RsvpError::RsvpNotFound);
        }

        info!("Cancelled RSVP {}", existing.rsvp_id);
        Ok(existing.rsvp_id)
    }
}
