use std::env;

use migration::MigratorTrait;
use reqwest::Client;

use crate::prelude::*;

/// Runtime configuration, read once from the environment. Optional values
/// cover external services; the call site errors when one is needed but
/// missing.
#[derive(Clone)]
pub struct Config {
  pub server_secret: String,
  pub client_url: Option<String>,
  pub gemini_api_key: Option<String>,
  pub gemini_model: String,
  pub broadcast_webhook_url: Option<String>,
  pub evolution_api_url: Option<String>,
  pub evolution_api_key: Option<String>,
  pub webhook_url: Option<String>,
  pub webhook_secret: Option<String>,
}

impl Config {
  pub fn from_env() -> Self {
    Self {
      server_secret: env::var("SERVER_SECRET").expect("SERVER_SECRET not set"),
      client_url: env::var("CLIENT_URL").ok(),
      gemini_api_key: env::var("GEMINI_API_KEY").ok(),
      gemini_model: env::var("GEMINI_MODEL")
        .unwrap_or_else(|_| "gemini-2.5-flash-lite".into()),
      broadcast_webhook_url: env::var("BROADCAST_WEBHOOK_URL").ok(),
      evolution_api_url: env::var("EVOLUTION_API_URL").ok(),
      evolution_api_key: env::var("EVOLUTION_API_KEY").ok(),
      webhook_url: env::var("WEBHOOK_URL").ok(),
      webhook_secret: env::var("WEBHOOK_SECRET").ok(),
    }
  }
}

pub struct AppState {
  pub db: DatabaseConnection,
  pub config: Config,
  pub http: Client,
}

impl AppState {
  pub async fn new(db_url: &str, config: Config) -> Self {
    let db = Database::connect(db_url).await.expect("Failed to connect DB");
    migration::Migrator::up(&db, None).await.expect("Migration failed");

    Self { db, config, http: Client::new() }
  }
}
