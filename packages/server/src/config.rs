use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Deployment flavour. Drives the attributes of the session cookie.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnv {
    #[default]
    Development,
    Production,
}

impl RuntimeEnv {
    pub fn is_production(self) -> bool {
        self == RuntimeEnv::Production
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub uri: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    pub name: String,
    pub app_name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of issued tokens and of the cookie carrying them.
    pub token_ttl_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub environment: RuntimeEnv,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

/// Frontend origins allowed to make credentialed cross-origin requests.
pub const DEFAULT_ALLOW_ORIGINS: [&str; 4] = [
    "http://localhost:5173",
    "http://localhost:5174",
    "https://study-hub-514b5.web.app",
    "https://study-hub-514b5.firebaseapp.com",
];

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("STUDY_HUB_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        Self::builder()?
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., STUDY_HUB__AUTH__JWT_SECRET)
            .add_source(
                Environment::with_prefix("STUDY_HUB")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let origins: Vec<String> = DEFAULT_ALLOW_ORIGINS.iter().map(|s| s.to_string()).collect();

        Config::builder()
            .set_default("environment", "development")?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.cors.allow_origins", origins)?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.uri", "mongodb://localhost:27017")?
            .set_default("database.name", "studyHub")?
            .set_default("database.app_name", "study-hub")?
            .set_default("auth.jwt_secret", "change-me")?
            .set_default("auth.token_ttl_days", 365)
    }
}
