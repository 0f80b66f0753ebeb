//! DTOs module - Data Transfer Objects
//!
//! Questo modulo contiene tutti i DTOs usati per la comunicazione client-server
//! e tra i service e i repository.
//! I DTOs separano la rappresentazione esterna (API) dalla rappresentazione interna (entities).

pub mod rsvp;
pub mod user;

pub use rsvp::{
    CreateRsvpDTO, CreateRsvpRequestDTO, EventRsvpCountDTO, RsvpAckDTO, RsvpDTO, UpdateRsvpDTO,
    UpdateRsvpRequestDTO,
};
pub use user::{CreateUserDTO, LoginDTO, RegisterUserDTO, UserDTO};
