use config::ConfigError;
use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub security: SecuritySettings,
    #[serde(default)]
    pub auth: AuthSettings,
    pub events: EventSettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: String,
}

#[derive(Deserialize, Clone)]
pub struct SecuritySettings {
    pub identity_salt: String,
    pub admin_token: String,
}

/// Static token table standing in for the external identity provider.
#[derive(Deserialize, Clone, Default)]
pub struct AuthSettings {
    #[serde(default)]
    pub users: Vec<UserSettings>,
}

#[derive(Deserialize, Clone)]
pub struct UserSettings {
    pub token: String,
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    #[serde(default)]
    pub admin: bool,
}

#[derive(Deserialize, Clone)]
pub struct EventSettings {
    pub capacity: usize,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let s = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.cors_origins", "*")?
            .set_default("security.identity_salt", "change_me_please")?
            .set_default("security.admin_token", "admin_secret_123")?
            .set_default("events.capacity", 100)?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::File::with_name(&format!("config.{}", run_mode)).required(false))
            .add_source(
                config::Environment::with_prefix("FORUM")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}
