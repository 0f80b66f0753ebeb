//! Integration tests per gli endpoints di autenticazione
//!
//! Test per:
//! - POST /auth/login
//! - POST /auth/register
//! - POST /auth/logout
//! - GET  /auth/me
//!
//! I test che toccano la tabella `users` usano `#[sqlx::test]` che:
//! - Crea automaticamente un database di test isolato
//! - Applica le migrations da `migrations/`
//! - Applica i fixtures specificati da `fixtures/`
//! - Pulisce il database al termine
//!
//! Girano quando `DATABASE_URL` è impostata in fase di build (vedi `build.rs`),
//! altrimenti restano `#[ignore]`.

mod common;

#[cfg(test)]
mod auth_tests {
    use super::common::*;
    use axum_test::http::HeaderName;
    use clubhouse::auth::AuthPlatform;
    use serde_json::{Value, json};
    use sqlx::MySqlPool;

    // ============================================================
    // Test senza database
    // ============================================================

    #[tokio::test]
    async fn test_logout_clears_session_cookie() {
        let server = create_test_server(create_test_state(AuthPlatform::Web));

        let response = server.post("/auth/logout").await;

        response.assert_status_ok();
        let cookie = response
            .headers()
            .get("set-cookie")
            .expect("Set-Cookie header should be present")
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_me_anonymous_is_unauthorized() {
        let server = create_test_server(create_test_state(AuthPlatform::Native));

        let response = server.get("/auth/me").await;

        response.assert_status_unauthorized();
        assert_eq!(response.json::<Value>()["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = create_test_server(create_test_state(AuthPlatform::Native));

        server.get("/").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_login_missing_password() {
        let server = create_test_server(create_test_state(AuthPlatform::Native));

        let response = server
            .post("/auth/login")
            .json(&json!({ "email": "alice@example.com" }))
            .await;

        // 422 Unprocessable Entity quando manca un campo obbligatorio
        response.assert_status_unprocessable_entity();
    }

    #[tokio::test]
    async fn test_register_empty_body() {
        let server = create_test_server(create_test_state(AuthPlatform::Native));

        let response = server.post("/auth/register").json(&json!({})).await;

        // 422 Unprocessable Entity quando manca un campo obbligatorio
        response.assert_status_unprocessable_entity();
    }

    #[tokio::test]
    async fn test_register_invalid_email() {
        let server = create_test_server(create_test_state(AuthPlatform::Native));

        let body = json!({
            "email": "not-an-email",
            "password": "Password123",
            "displayName": "Newcomer"
        });

        let response = server.post("/auth/register").json(&body).await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_register_password_too_short() {
        let server = create_test_server(create_test_state(AuthPlatform::Native));

        let body = json!({
            "email": "newcomer@example.com",
            "password": "Pass1",
            "displayName": "Newcomer"
        });

        let response = server.post("/auth/register").json(&body).await;

        response.assert_status_bad_request();
    }

    // ============================================================
    // Test per POST /auth/register - register_user
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    #[cfg_attr(not(mysql_tests), ignore = "requires a MySQL database in DATABASE_URL")]
    async fn test_register_success(pool: MySqlPool) -> sqlx::Result<()> {
        let server = create_test_server(create_db_test_state(pool));

        let body = json!({
            "email": "newcomer@example.com",
            "password": "Password123",
            "displayName": "Newcomer"
        });

        let response = server.post("/auth/register").json(&body).await;

        response.assert_status_ok();
        let user: Value = response.json();
        assert!(user.get("id").is_some(), "User should have an id");
        assert_eq!(user["email"], "newcomer@example.com");
        assert_eq!(user["displayName"], "Newcomer");
        assert!(user.get("password").is_none(), "Password must not leak");

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    #[cfg_attr(not(mysql_tests), ignore = "requires a MySQL database in DATABASE_URL")]
    async fn test_register_duplicate_email(pool: MySqlPool) -> sqlx::Result<()> {
        let server = create_test_server(create_db_test_state(pool));

        let body = json!({
            "email": "alice@example.com",
            "password": "Password123",
            "displayName": "Another Alice"
        });

        let response = server.post("/auth/register").json(&body).await;

        response.assert_status_conflict();
        Ok(())
    }

    // ============================================================
    // Test per POST /auth/login - login_user
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    #[cfg_attr(not(mysql_tests), ignore = "requires a MySQL database in DATABASE_URL")]
    async fn test_register_then_login(pool: MySqlPool) -> sqlx::Result<()> {
        let server = create_test_server(create_db_test_state(pool));

        let register_body = json!({
            "email": "logintest@example.com",
            "password": "TestLogin123",
            "displayName": "Login Test"
        });
        server
            .post("/auth/register")
            .json(&register_body)
            .await
            .assert_status_ok();

        let login_body = json!({
            "email": "logintest@example.com",
            "password": "TestLogin123"
        });
        let response = server.post("/auth/login").json(&login_body).await;

        response.assert_status_ok();

        let headers = response.headers();
        let cookie = headers
            .get("set-cookie")
            .expect("Set-Cookie header should be present")
            .to_str()
            .unwrap();
        assert!(cookie.starts_with("token="));
        assert!(cookie.contains("HttpOnly"));

        let auth_header = headers
            .get("authorization")
            .expect("Authorization header should be present")
            .to_str()
            .unwrap()
            .to_string();
        assert!(
            auth_header.starts_with("Bearer "),
            "Authorization should start with 'Bearer '"
        );

        // il token appena emesso identifica il membro su /auth/me
        let response = server
            .get("/auth/me")
            .add_header(HeaderName::from_static("authorization"), auth_header)
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["email"], "logintest@example.com");

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    #[cfg_attr(not(mysql_tests), ignore = "requires a MySQL database in DATABASE_URL")]
    async fn test_login_wrong_password(pool: MySqlPool) -> sqlx::Result<()> {
        let server = create_test_server(create_db_test_state(pool));

        let register_body = json!({
            "email": "wrongpass@example.com",
            "password": "RightPassword1",
            "displayName": "Wrong Pass"
        });
        server
            .post("/auth/register")
            .json(&register_body)
            .await
            .assert_status_ok();

        let body = json!({
            "email": "wrongpass@example.com",
            "password": "wrongpassword"
        });
        let response = server.post("/auth/login").json(&body).await;

        response.assert_status_unauthorized();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    #[cfg_attr(not(mysql_tests), ignore = "requires a MySQL database in DATABASE_URL")]
    async fn test_login_unknown_email(pool: MySqlPool) -> sqlx::Result<()> {
        let server = create_test_server(create_db_test_state(pool));

        let body = json!({
            "email": "nobody@example.com",
            "password": "password123"
        });
        let response = server.post("/auth/login").json(&body).await;

        response.assert_status_unauthorized();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    #[cfg_attr(not(mysql_tests), ignore = "requires a MySQL database in DATABASE_URL")]
    async fn test_me_with_token_for_fixture_user(pool: MySqlPool) -> sqlx::Result<()> {
        let server = create_test_server(create_db_test_state(pool));

        let token = create_test_jwt(1, "alice@example.com", JWT_SECRET);
        let response = server
            .get("/auth/me")
            .add_header(HeaderName::from_static("authorization"), format!("Bearer {token}"))
            .await;

        response.assert_status_ok();
        let user: Value = response.json();
        assert_eq!(user["id"], 1);
        assert_eq!(user["email"], "alice@example.com");

        Ok(())
    }
}
