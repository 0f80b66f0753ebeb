use crate::core::auth::AuthPlatform;
use crate::repositories::RsvpStoreKind;
use dotenv::dotenv;
use std::env;
use tracing::{info, warn};

const DEFAULT_JWT_SECRET: &str = "clubhouse-dev-secret";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
    pub max_connections: u32,
    pub connection_lifetime_secs: u64,
    pub app_env: String,
    pub auth_platform: AuthPlatform,
    pub rsvp_store: RsvpStoreKind,
    pub cors_allowed_origins: Vec<String>,
    pub cookie_same_site: String,
}

impl Config {
    /// Carica la configurazione dalle variabili d'ambiente
    /// Chiama dotenv() automaticamente
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set in .env file".to_string())?;

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using default (not secure for production!)");
            DEFAULT_JWT_SECRET.to_string()
        });

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| "Invalid SERVER_PORT: must be a number between 0-65535".to_string())?;

        let max_connections = env::var("MAX_DB_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()
            .map_err(|_| "Invalid MAX_DB_CONNECTIONS: must be a positive number".to_string())?;

        let connection_lifetime_secs = env::var("DB_CONNECTION_LIFETIME_SECS")
            .unwrap_or_else(|_| "1800".to_string())
            .parse::<u64>()
            .map_err(|_| {
                "Invalid DB_CONNECTION_LIFETIME_SECS: must be a positive number".to_string()
            })?;

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let auth_platform = env::var("AUTH_PLATFORM")
            .unwrap_or_else(|_| "web".to_string())
            .parse::<AuthPlatform>()?;

        let rsvp_store = env::var("RSVP_STORE")
            .unwrap_or_else(|_| "mysql".to_string())
            .parse::<RsvpStoreKind>()?;

        let cors_allowed_origins = Self::parse_origins(
            &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
        );

        let cookie_same_site = Self::parse_same_site(
            &env::var("COOKIE_SAME_SITE").unwrap_or_else(|_| "Lax".to_string()),
        )?;

        Ok(Config {
            database_url,
            jwt_secret,
            server_host,
            server_port,
            max_connections,
            connection_lifetime_secs,
            app_env,
            auth_platform,
            rsvp_store,
            cors_allowed_origins,
            cookie_same_site,
        })
    }

    /// Lista separata da virgole, elementi vuoti ignorati
    fn parse_origins(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn parse_same_site(raw: &str) -> Result<String, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "lax" => Ok("Lax".to_string()),
            "strict" => Ok("Strict".to_string()),
            "none" => Ok("None".to_string()),
            other => Err(format!(
                "Invalid COOKIE_SAME_SITE '{}': expected Lax, Strict or None",
                other
            )),
        }
    }

    /// Logga la configurazione (nascondendo i segreti)
    pub fn print_info(&self) {
        info!("Server configuration");
        info!("   Environment: {}", self.app_env);
        info!("   Server Address: {}:{}", self.server_host, self.server_port);
        info!("   Database: {}", Self::mask_url(&self.database_url));
        info!("   Max DB Connections: {}", self.max_connections);
        info!("   Connection Lifetime: {}s", self.connection_lifetime_secs);
        info!("   Auth platform: {}", self.auth_platform);
        info!("   RSVP store: {:?}", self.rsvp_store);
        info!("   CORS origins: {:?}", self.cors_allowed_origins);
        if self.jwt_secret == DEFAULT_JWT_SECRET {
            warn!("   JWT Secret: USING DEFAULT (INSECURE!)");
        } else {
            info!("   JWT Secret: custom secret configured");
        }
    }

    /// Maschera l'URL del database per il logging
    fn mask_url(url: &str) -> String {
        if let Some(at_pos) = url.find('@') {
            if let Some(scheme_end) = url.find("://") {
                let scheme = &url[..scheme_end + 3];
                let after_at = &url[at_pos..];
                return format!("{}***{}", scheme, after_at);
            }
        }
        "***".to_string()
    }
}
