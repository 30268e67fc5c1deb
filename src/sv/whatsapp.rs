//! Evolution API client for WhatsApp instance lifecycle. One instance per
//! tenant, named by the user id. Gateway responses are passed through as
//! opaque JSON.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::{prelude::*, state::Config};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateInstancePayload<'a> {
  instance_name: &'a str,
  token: &'a str,
  number: &'a str,
  qrcode: bool,
  integration: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  webhook: Option<WebhookConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookConfig {
  url: String,
  by_events: bool,
  base64: bool,
  headers: json::Value,
  events: Vec<&'static str>,
}

#[derive(Clone)]
pub struct Whatsapp {
  client: Client,
  base_url: String,
  api_key: String,
  webhook_url: Option<String>,
  webhook_secret: Option<String>,
}

impl Whatsapp {
  pub fn from_config(client: &Client, config: &Config) -> Result<Self> {
    let base_url = config.evolution_api_url.clone().ok_or_else(|| {
      Error::Whatsapp("EVOLUTION_API_URL is not configured".into())
    })?;

    Ok(Self {
      client: client.clone(),
      base_url: base_url.trim_end_matches('/').to_string(),
      api_key: config.evolution_api_key.clone().unwrap_or_default(),
      webhook_url: config.webhook_url.clone(),
      webhook_secret: config.webhook_secret.clone(),
    })
  }

  fn webhook(&self) -> Option<WebhookConfig> {
    let url = self.webhook_url.clone()?;
    let auth = format!(
      "Bearer {}",
      self.webhook_secret.clone().unwrap_or_default()
    );

    Some(WebhookConfig {
      url,
      by_events: true,
      base64: false,
      headers: json::json!({
        "Authorization": auth,
        "Content-Type": "application/json",
      }),
      events: vec!["QRCODE_UPDATED", "MESSAGES_UPSERT", "CONNECTION_UPDATE"],
    })
  }

  async fn get(&self, path: &str) -> Result<json::Value> {
    let response = self
      .client
      .get(format!("{}{}", self.base_url, path))
      .header("apikey", &self.api_key)
      .send()
      .await
      .map_err(|e| Error::Whatsapp(format!("Request failed: {e}")))?;

    Self::read(response).await
  }

  async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<json::Value> {
    let response = self
      .client
      .post(format!("{}{}", self.base_url, path))
      .header("apikey", &self.api_key)
      .json(body)
      .send()
      .await
      .map_err(|e| Error::Whatsapp(format!("Request failed: {e}")))?;

    Self::read(response).await
  }

  async fn read(response: reqwest::Response) -> Result<json::Value> {
    let status = response.status();
    if !status.is_success() {
      let detail = response.text().await.unwrap_or_default();
      return Err(Error::Whatsapp(format!("{status}: {detail}")));
    }

    response
      .json()
      .await
      .map_err(|e| Error::Whatsapp(format!("Failed to parse response: {e}")))
  }

  /// Creates the tenant's instance. When the gateway reports the instance
  /// already exists: a connected instance is reused; a stale one is
  /// deleted and the creation retried so the new number takes effect.
  pub async fn create_instance(
    &self,
    instance: &str,
    number: &str,
  ) -> Result<json::Value> {
    let payload = CreateInstancePayload {
      instance_name: instance,
      token: instance,
      number,
      qrcode: false,
      integration: "WHATSAPP-BAILEYS",
      webhook: self.webhook(),
    };

    match self.post("/instance/create", &payload).await {
      Ok(value) => Ok(value),
      Err(Error::Whatsapp(msg))
        if msg.starts_with("403") || msg.contains("already exists") =>
      {
        let state = self.connection_state(instance).await?;
        if state["instance"]["state"] == "open" {
          return Ok(json::json!({
            "instanceExists": true,
            "status": "connected",
          }));
        }

        info!("deleting stale instance {instance} before recreate");
        self.delete_instance(instance).await?;
        tokio::time::sleep(Duration::from_secs(1)).await;
        self.post("/instance/create", &payload).await
      }
      Err(err) => Err(err),
    }
  }

  /// Returns the pairing payload (QR code or pairing code).
  pub async fn connect_instance(&self, instance: &str) -> Result<json::Value> {
    self.get(&format!("/instance/connect/{instance}")).await
  }

  /// A 404 from the gateway means the instance does not exist and maps to
  /// a closed state.
  pub async fn connection_state(&self, instance: &str) -> Result<json::Value> {
    let response = self
      .client
      .get(format!("{}/instance/connectionState/{instance}", self.base_url))
      .header("apikey", &self.api_key)
      .send()
      .await
      .map_err(|e| Error::Whatsapp(format!("Request failed: {e}")))?;

    if response.status() == StatusCode::NOT_FOUND {
      return Ok(json::json!({ "instance": { "state": "close" } }));
    }

    Self::read(response).await
  }

  pub async fn delete_instance(&self, instance: &str) -> Result<json::Value> {
    let response = self
      .client
      .delete(format!("{}/instance/delete/{instance}", self.base_url))
      .header("apikey", &self.api_key)
      .send()
      .await
      .map_err(|e| Error::Whatsapp(format!("Request failed: {e}")))?;

    Self::read(response).await
  }
}
