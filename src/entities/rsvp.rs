//! Rsvp entity - Prenotazione di un membro a un evento

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numero minimo di partecipanti coperti da una prenotazione (il membro stesso)
pub const MIN_GUESTS: i32 = 1;

/// Numero massimo di partecipanti coperti da una prenotazione
pub const MAX_GUESTS: i32 = 10;

/// Una riga della tabella `rsvps`.
///
/// La coppia `(user_id, event_id)` è unica: un membro ha al massimo una
/// prenotazione per evento.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Rsvp {
    pub rsvp_id: i32,
    pub user_id: i32, // proprietario, mai modificato dopo la creazione
    pub event_id: String, // id opaco del catalogo eventi (esterno)
    pub guests: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Rsvp {
    /// true se `guests` rientra nell'intervallo consentito, estremi inclusi.
    ///
    /// Accetta un `i64` perché il valore arriva dal client così com'è:
    /// il restringimento a `i32` avviene solo dopo questo controllo.
    pub fn is_valid_guest_count(guests: i64) -> bool {
        (i64::from(MIN_GUESTS)..=i64::from(MAX_GUESTS)).contains(&guests)
    }
}
