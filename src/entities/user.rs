//! User entity - Entità membro del club con metodi per gestione password

use bcrypt::{DEFAULT_COST, hash, verify};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub user_id: i32,
    pub email: String, // univoca, usata per il login
    pub display_name: String,
    pub password: String, // hash bcrypt, mai in chiaro
}

impl User {
    /// Verify if target_password matches the stored hashed password
    pub fn verify_password(&self, target_password: &str) -> bool {
        verify(target_password, &self.password).unwrap_or(false)
    }

    /// Hash a password using bcrypt with default cost
    pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
        let hash = hash(password, DEFAULT_COST)?;
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies() {
        let hashed = User::hash_password("Password123").unwrap();
        let user = User {
            user_id: 1,
            email: "alice@example.com".to_string(),
            display_name: "Alice".to_string(),
            password: hashed,
        };

        assert!(user.verify_password("Password123"));
        assert!(!user.verify_password("password123"));
    }
}
