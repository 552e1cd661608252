//! Settings for the application, read from `settings.toml`. Sections
//! for external services are optional; a missing section leaves the
//! matching client unconfigured.
use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
    pub jwt_secret: String,
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Ocr {
    pub api_key: String,
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub webhook_url: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct Mail {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Option<Server>,
    pub storage: Option<Storage>,
    pub ocr: Option<Ocr>,
    pub chat: Option<Chat>,
    pub mail: Option<Mail>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .build()?;

        settings.try_deserialize()
    }
}
