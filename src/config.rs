use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: Server,
    pub db: Db,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone)]
pub struct Db {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Load settings from built-in defaults, `config/default.toml`,
/// `config/<env>.toml`, and `ACCOUNT_REPORTS__*` env overrides.
pub fn load() -> Result<Settings, config::ConfigError> {
    let env_name = std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());
    builder(&env_name)?.build()?.try_deserialize()
}

fn builder(
    env_name: &str,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    Ok(config::Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 5001_i64)?
        .set_default("db.host", "localhost")?
        .set_default("db.port", 5432_i64)?
        .set_default("db.name", "bank")?
        .set_default("db.user", "postgres")?
        .set_default("db.password", "postgres")?
        .add_source(config::File::with_name("config/default").required(false))
        .add_source(config::File::with_name(&format!("config/{env_name}")).required(false))
        .add_source(
            config::Environment::with_prefix("ACCOUNT_REPORTS")
                .prefix_separator("__")
                .separator("__"),
        ))
}
