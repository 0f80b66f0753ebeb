//! Rsvp DTOs - Data Transfer Objects per le prenotazioni agli eventi

use crate::entities::Rsvp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Prenotazione così come viene restituita al client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RsvpDTO {
    pub id: i32,
    pub user_id: i32,
    pub event_id: String,
    pub guests: i32,
    pub notes: Option<String>,
    // il client si aspetta millisecondi dall'epoch
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl From<Rsvp> for RsvpDTO {
    fn from(value: Rsvp) -> Self {
        Self {
            id: value.rsvp_id,
            user_id: value.user_id,
            event_id: value.event_id,
            guests: value.guests,
            notes: value.notes,
            created_at: value.created_at,
        }
    }
}

/// Body di `POST /events/{event_id}/rsvp`
///
/// `guests` non è validato in fase di deserializzazione: il controllo
/// dell'intervallo avviene nel manager, dopo quello sui duplicati.
/// È un `i64` così che un intero fuori scala arrivi comunque al manager.
#[derive(Deserialize, Debug, Clone)]
pub struct CreateRsvpRequestDTO {
    pub guests: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body di `PATCH /events/{event_id}/rsvp`
#[derive(Deserialize, Debug, Clone)]
pub struct UpdateRsvpRequestDTO {
    pub guests: i64,
    /// Campo assente: note invariate. `null`: note cancellate. Stringa: note sostituite.
    #[serde(default, deserialize_with = "deserialize_present")]
    pub notes: Option<Option<String>>,
}

/// Distingue un campo presente (anche `null`) da uno assente
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Risposta delle operazioni di scrittura
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RsvpAckDTO {
    pub id: i32,
    pub success: bool,
}

/// Aggregato pubblico per la capienza di un evento
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventRsvpCountDTO {
    pub rsvp_count: i64,
    pub total_guests: i64,
}

impl EventRsvpCountDTO {
    /// Calcola l'aggregato a partire dalle prenotazioni dell'evento
    pub fn from_rsvps(rsvps: &[Rsvp]) -> Self {
        Self {
            rsvp_count: rsvps.len() as i64,
            total_guests: rsvps.iter().map(|r| i64::from(r.guests)).sum(),
        }
    }
}

/// DTO per creare una nuova prenotazione (senza rsvp_id, assegnato dallo store)
#[derive(Debug, Clone)]
pub struct CreateRsvpDTO {
    pub user_id: i32,
    pub event_id: String,
    pub guests: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// DTO per aggiornare una prenotazione (solo i campi `Some(_)` vengono modificati)
#[derive(Debug, Clone, Default)]
pub struct UpdateRsvpDTO {
    pub guests: Option<i32>,
    pub notes: Option<Option<String>>,
}
