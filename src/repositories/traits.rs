//! Common repository traits
//!
//! This module defines generic interfaces for database operations, shared by
//! every storage backend (MySQL and in-memory).
//!
//! Methods return `impl Future + Send` so that repositories can be used from
//! axum handlers and spawned tasks; implementors simply write `async fn`.

use crate::dtos::{CreateRsvpDTO, UpdateRsvpDTO};
use crate::entities::Rsvp;
use std::future::Future;

/// Errors returned by every repository
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A unique constraint rejected the write (e.g. a second RSVP for the same user and event)
    #[error("unique constraint violated on {0}")]
    UniqueViolation(&'static str),

    /// The row references a parent that does not exist (e.g. an RSVP for a deleted user)
    #[error("foreign key violated on {0}")]
    ForeignKeyViolation(&'static str),

    /// Any other failure of the underlying database
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    /// Wraps a sqlx error, recognising unique-key and foreign-key violations
    /// reported by the database
    pub fn from_insert(
        err: sqlx::Error,
        unique_key: &'static str,
        foreign_key: &'static str,
    ) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                Self::UniqueViolation(unique_key)
            }
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                Self::ForeignKeyViolation(foreign_key)
            }
            other => Self::Database(other),
        }
    }
}

/// Trait for creating new entities in the database
///
/// # Type Parameters
/// * `Entity` - Type of the returned entity (with ID assigned by the database)
/// * `CreateDTO` - DTO for creation (without ID, will be automatically generated)
pub trait Create<Entity, CreateDTO> {
    /// Creates a new entity in the database
    ///
    /// # Returns
    /// * `Ok(Entity)` - Created entity with ID assigned by the database
    /// * `Err(RepositoryError::UniqueViolation)` - A unique constraint rejected the insert
    /// * `Err(RepositoryError::Database)` - Error during insertion
    fn create(
        &self,
        data: &CreateDTO,
    ) -> impl Future<Output = Result<Entity, RepositoryError>> + Send;
}

/// Trait for reading a single entity by primary key
///
/// # Type Parameters
/// * `Entity` - Type of the entity to read
/// * `Id` - Type of the primary key (e.g. `i32`, `String`, `(i32, i32)`)
pub trait Read<Entity, Id> {
    /// Reads an entity from the database by its primary key
    ///
    /// # Returns
    /// * `Ok(Some(Entity))` - Entity found
    /// * `Ok(None)` - No entity with that ID
    /// * `Err(RepositoryError)` - Error during reading
    fn read(&self, id: &Id) -> impl Future<Output = Result<Option<Entity>, RepositoryError>> + Send;
}

/// Trait for updating existing entities
///
/// # Type Parameters
/// * `Entity` - Type of the updated entity
/// * `UpdateDTO` - DTO for updating (optional fields for partial updates)
/// * `Id` - Type of the primary key
pub trait Update<Entity, UpdateDTO, Id> {
    /// Updates an existing entity in the database
    ///
    /// # Returns
    /// * `Ok(Some(Entity))` - Updated entity
    /// * `Ok(None)` - No entity with that ID (nothing was written)
    /// * `Err(RepositoryError)` - Error during update
    fn update(
        &self,
        id: &Id,
        data: &UpdateDTO,
    ) -> impl Future<Output = Result<Option<Entity>, RepositoryError>> + Send;
}

/// Trait for deleting entities
///
/// # Type Parameters
/// * `Id` - Type of the primary key
pub trait Delete<Id> {
    /// Deletes an entity from the database
    ///
    /// # Returns
    /// * `Ok(true)` - Entity deleted
    /// * `Ok(false)` - No entity with that ID
    /// * `Err(RepositoryError)` - Error during deletion
    fn delete(&self, id: &Id) -> impl Future<Output = Result<bool, RepositoryError>> + Send;
}

/// Full contract of an RSVP store: CRUD plus the lookups backed by the
/// `(user_id)`, `(event_id)` and unique `(user_id, event_id)` indexes.
///
/// Implementations must reject a second `create` for the same
/// `(user_id, event_id)` pair with [`RepositoryError::UniqueViolation`],
/// even when two inserts race.
pub trait RsvpStore:
    Create<Rsvp, CreateRsvpDTO>
    + Read<Rsvp, i32>
    + Update<Rsvp, UpdateRsvpDTO, i32>
    + Delete<i32>
    + Send
    + Sync
{
    /// Unique lookup on the `(user_id, event_id)` pair
    fn find_by_user_and_event(
        &self,
        user_id: &i32,
        event_id: &str,
    ) -> impl Future<Output = Result<Option<Rsvp>, RepositoryError>> + Send;

    /// All RSVPs owned by a user, in store order
    fn find_many_by_user_id(
        &self,
        user_id: &i32,
    ) -> impl Future<Output = Result<Vec<Rsvp>, RepositoryError>> + Send;

    /// All RSVPs for an event, in store order
    fn find_many_by_event_id(
        &self,
        event_id: &str,
    ) -> impl Future<Output = Result<Vec<Rsvp>, RepositoryError>> + Send;
}
