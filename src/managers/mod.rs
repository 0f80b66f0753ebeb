//! Managers - Regole di dominio indipendenti dal trasporto HTTP

pub mod rsvp;

pub use rsvp::{RsvpError, RsvpManager};
