//! UserRepository - Repository per la gestione dei membri

use super::{Create, Read, RepositoryError};
use crate::dtos::CreateUserDTO;
use crate::entities::User;
use sqlx::MySqlPool;

// USER REPO
#[derive(Clone)]
pub struct UserRepository {
    connection_pool: MySqlPool,
}

impl UserRepository {
    pub fn new(connection_pool: MySqlPool) -> UserRepository {
        Self { connection_pool }
    }

    /// L'email è univoca (vincolo `uq_users_email`)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, email, display_name, password FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }
}

impl Create<User, CreateUserDTO> for UserRepository {
    async fn create(&self, data: &CreateUserDTO) -> Result<User, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO users (email, display_name, password) VALUES (?, ?, ?)",
        )
        .bind(&data.email)
        .bind(&data.display_name)
        .bind(&data.password)
        .execute(&self.connection_pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "users.uq_users_email", "users"))?;

        let new_id = result.last_insert_id() as i32;

        Ok(User {
            user_id: new_id,
            email: data.email.clone(),
            display_name: data.display_name.clone(),
            password: data.password.clone(),
        })
    }
}

impl Read<User, i32> for UserRepository {
    async fn read(&self, id: &i32) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, email, display_name, password FROM users WHERE user_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }
}
