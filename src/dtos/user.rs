//! User DTOs - Data Transfer Objects per utenti

use crate::entities::User;
use serde::{Deserialize, Serialize};
use validator::Validate;

// struct per gestire io col client
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserDTO {
    pub id: i32,
    pub email: String,
    pub display_name: String,
}

impl From<User> for UserDTO {
    fn from(value: User) -> Self {
        // la password non viene mai esposta al client
        Self {
            id: value.user_id,
            email: value.email,
            display_name: value.display_name,
        }
    }
}

/// Body della richiesta di registrazione
#[derive(Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserDTO {
    #[validate(email(message = "Email address is not valid"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 64, message = "Display name must be between 1 and 64 characters"))]
    pub display_name: String,
}

/// DTO per il login (solo email e password)
#[derive(Deserialize, Debug)]
pub struct LoginDTO {
    pub email: String,
    pub password: String,
}

/// DTO per creare un nuovo utente (senza user_id, password già hashata)
#[derive(Debug, Clone)]
pub struct CreateUserDTO {
    pub email: String,
    pub display_name: String,
    pub password: String,
}
