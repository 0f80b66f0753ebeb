//! RsvpRepository - Repository MySQL per le prenotazioni agli eventi
//!
//! L'unicità di `(user_id, event_id)` è garantita dalla chiave
//! `uq_rsvps_user_event` (vedi migrations): un insert concorrente perdente
//! viene rifiutato dal database e restituito come `UniqueViolation`.

use super::{Create, Delete, Read, RepositoryError, RsvpStore, Update};
use crate::dtos::{CreateRsvpDTO, UpdateRsvpDTO};
use crate::entities::Rsvp;
use sqlx::MySqlPool;
use tracing::{debug, instrument};

pub(crate) const RSVP_UNIQUE_KEY: &str = "rsvps.uq_rsvps_user_event";

pub(crate) const RSVP_USER_FOREIGN_KEY: &str = "rsvps.fk_rsvps_user";

// RSVP REPO
#[derive(Clone)]
pub struct RsvpRepository {
    connection_pool: MySqlPool,
}

impl RsvpRepository {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }
}

impl RsvpStore for RsvpRepository {
    async fn find_by_user_and_event(
        &self,
        user_id: &i32,
        event_id: &str,
    ) -> Result<Option<Rsvp>, RepositoryError> {
        let rsvp = sqlx::query_as::<_, Rsvp>(
            r#"
            SELECT rsvp_id, user_id, event_id, guests, notes, created_at
            FROM rsvps
            WHERE user_id = ? AND event_id = ?
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(rsvp)
    }

    async fn find_many_by_user_id(&self, user_id: &i32) -> Result<Vec<Rsvp>, RepositoryError> {
        let rsvps = sqlx::query_as::<_, Rsvp>(
            r#"
            SELECT rsvp_id, user_id, event_id, guests, notes, created_at
            FROM rsvps
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(rsvps)
    }

    async fn find_many_by_event_id(&self, event_id: &str) -> Result<Vec<Rsvp>, RepositoryError> {
        let rsvps = sqlx::query_as::<_, Rsvp>(
            r#"
            SELECT rsvp_id, user_id, event_id, guests, notes, created_at
            FROM rsvps
            WHERE event_id = ?
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(rsvps)
    }
}

impl Create<Rsvp, CreateRsvpDTO> for RsvpRepository {
    #[instrument(skip(self, data), fields(user_id = %data.user_id, event_id = %data.event_id))]
    async fn create(&self, data: &CreateRsvpDTO) -> Result<Rsvp, RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO rsvps (user_id, event_id, guests, notes, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.user_id)
        .bind(&data.event_id)
        .bind(data.guests)
        .bind(&data.notes)
        .bind(data.created_at)
        .execute(&self.connection_pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, RSVP_UNIQUE_KEY, RSVP_USER_FOREIGN_KEY))?;

        let new_id = result.last_insert_id() as i32;
        debug!("Inserted rsvp {}", new_id);

        Ok(Rsvp {
            rsvp_id: new_id,
            user_id: data.user_id,
            event_id: data.event_id.clone(),
            guests: data.guests,
            notes: data.notes.clone(),
            created_at: data.created_at,
        })
    }
}

impl Read<Rsvp, i32> for RsvpRepository {
    async fn read(&self, id: &i32) -> Result<Option<Rsvp>, RepositoryError> {
        let rsvp = sqlx::query_as::<_, Rsvp>(
            r#"
            SELECT rsvp_id, user_id, event_id, guests, notes, created_at
            FROM rsvps
            WHERE rsvp_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(rsvp)
    }
}

impl Update<Rsvp, UpdateRsvpDTO, i32> for RsvpRepository {
    #[instrument(skip(self, data))]
    async fn update(&self, id: &i32, data: &UpdateRsvpDTO) -> Result<Option<Rsvp>, RepositoryError> {
        // La riga resta bloccata fino al commit: un cancel concorrente
        // attende e l'update non finisce mai nel vuoto
        let mut tx = self.connection_pool.begin().await?;

        let current = sqlx::query_as::<_, Rsvp>(
            r#"
            SELECT rsvp_id, user_id, event_id, guests, notes, created_at
            FROM rsvps
            WHERE rsvp_id = ?
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut current) = current else {
            debug!("Rsvp {} vanished before update", id);
            return Ok(None);
        };

        if data.guests.is_none() && data.notes.is_none() {
            return Ok(Some(current));
        }

        let mut query_builder = sqlx::QueryBuilder::new("UPDATE rsvps SET ");
        let mut separated = query_builder.separated(", ");
        if let Some(guests) = data.guests {
            separated.push("guests = ");
            separated.push_bind_unseparated(guests);
            current.guests = guests;
        }
        if let Some(ref notes) = data.notes {
            separated.push("notes = ");
            separated.push_bind_unseparated(notes.clone());
            current.notes = notes.clone();
        }
        query_builder.push(" WHERE rsvp_id = ");
        query_builder.push_bind(*id);

        query_builder.build().execute(&mut *tx).await?;
        tx.commit().await?;

        Ok(Some(current))
    }
}

impl Delete<i32> for RsvpRepository {
    async fn delete(&self, id: &i32) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM rsvps WHERE rsvp_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn millis_now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(Utc::now().timestamp_millis()).unwrap()
    }

    fn new_rsvp(user_id: i32, event_id: &str, guests: i32) -> CreateRsvpDTO {
        CreateRsvpDTO {
            user_id,
            event_id: event_id.to_string(),
            guests,
            notes: None,
            created_at: millis_now(),
        }
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "rsvps")))]
    #[cfg_attr(not(mysql_tests), ignore = "requires a MySQL database in DATABASE_URL")]
    async fn test_find_by_user_and_event(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = RsvpRepository::new(pool);

        let rsvp = repo.find_by_user_and_event(&1, "spring-gala").await.unwrap();
        let rsvp = rsvp.expect("alice has an RSVP for spring-gala");
        assert_eq!(rsvp.guests, 2);
        assert_eq!(rsvp.notes.as_deref(), Some("vegan"));

        assert!(repo.find_by_user_and_event(&1, "wine-tasting").await.unwrap().is_none());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "rsvps")))]
    #[cfg_attr(not(mysql_tests), ignore = "requires a MySQL database in DATABASE_URL")]
    async fn test_duplicate_insert_is_rejected_by_unique_key(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = RsvpRepository::new(pool);

        let err = repo.create(&new_rsvp(1, "spring-gala", 1)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueViolation(_)));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "rsvps")))]
    #[cfg_attr(not(mysql_tests), ignore = "requires a MySQL database in DATABASE_URL")]
    async fn test_insert_for_unknown_user_is_foreign_key_violation(
        pool: MySqlPool,
    ) -> sqlx::Result<()> {
        let repo = RsvpRepository::new(pool);

        let err = repo.create(&new_rsvp(99, "spring-gala", 1)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "rsvps")))]
    #[cfg_attr(not(mysql_tests), ignore = "requires a MySQL database in DATABASE_URL")]
    async fn test_concurrent_inserts_keep_one_row(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = RsvpRepository::new(pool);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.create(&new_rsvp(3, "wine-tasting", 2)).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(RepositoryError::UniqueViolation(_)) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(repo.find_many_by_user_id(&3).await.unwrap().len(), 1);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "rsvps")))]
    #[cfg_attr(not(mysql_tests), ignore = "requires a MySQL database in DATABASE_URL")]
    async fn test_update_and_delete(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = RsvpRepository::new(pool);
        let rsvp = repo.find_by_user_and_event(&1, "spring-gala").await.unwrap().unwrap();

        let updated = repo
            .update(
                &rsvp.rsvp_id,
                &UpdateRsvpDTO {
                    guests: Some(5),
                    notes: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.guests, 5);
        assert_eq!(updated.notes.as_deref(), Some("vegan"));
        assert_eq!(repo.read(&rsvp.rsvp_id).await.unwrap(), Some(updated));

        assert!(repo.delete(&rsvp.rsvp_id).await.unwrap());
        assert!(!repo.delete(&rsvp.rsvp_id).await.unwrap());
        assert!(
            repo.update(&rsvp.rsvp_id, &UpdateRsvpDTO::default())
                .await
                .unwrap()
                .is_none()
        );
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "rsvps")))]
    #[cfg_attr(not(mysql_tests), ignore = "requires a MySQL database in DATABASE_URL")]
    async fn test_find_many_by_event_id(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = RsvpRepository::new(pool);

        let rsvps = repo.find_many_by_event_id("spring-gala").await.unwrap();
        let total: i32 = rsvps.iter().map(|r| r.guests).sum();
        assert_eq!(rsvps.len(), 3);
        assert_eq!(total, 7);
        Ok(())
    }
}
