use reqwest::Client;
use serde::Deserialize;

use crate::{
  entity::{
    BroadcastStatus, CampaignStatus, MessageType, broadcast_log,
    broadcast_message, campaign, user,
  },
  prelude::*,
  sv::{self, Gemini},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMessage {
  pub campaign_id: String,
  pub broadcast_group_id: Option<String>,
  #[serde(default)]
  pub message_type: MessageType,
  pub achievement_status_filter: Option<String>,
  pub prompt: Option<String>,
}

fn default_group() -> String {
  "default".into()
}

fn default_status_filter() -> String {
  "all".into()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendBroadcast {
  pub campaign_id: String,
  #[serde(default = "default_group")]
  pub broadcast_group_id: String,
  #[serde(default = "default_status_filter")]
  pub achievement_status: String,
  #[serde(default)]
  pub message: String,
  #[serde(default)]
  pub message_type: MessageType,
}

/// Builds the LLM prompt from campaign fields. Custom messages wrap the
/// caller's prompt; everything else uses the recruitment template.
pub fn build_prompt(
  campaign: &campaign::Model,
  message_type: MessageType,
  prompt: Option<&str>,
) -> Result<String> {
  let start = campaign.start_date.format("%d %B %Y");
  let end = campaign.end_date.format("%d %B %Y");

  if message_type == MessageType::Custom {
    let prompt = prompt.ok_or_else(|| {
      Error::InvalidArgs("Prompt is required for custom message".into())
    })?;

    return Ok(format!(
      "You are a professional copywriter for WhatsApp influencer \
       campaigns. Turn the following request into a single concise \
       WhatsApp broadcast message, using the campaign data below.\n\n\
       Request: {prompt}\n\n\
       Campaign: {name}\n\
       Product: {product}\n\
       Brief: {brief}\n\
       Start date: {start}\n\
       End date: {end}\n\n\
       Output exactly one plain-text message. No JSON, no lists, no \
       numbering.",
      name = campaign.name,
      product = campaign.product_name,
      brief = campaign.brief,
    ));
  }

  Ok(format!(
    "You are a professional copywriter for WhatsApp influencer campaigns. \
     Turn the campaign brief below into a single concise, persuasive \
     WhatsApp broadcast message inviting creators to join.\n\n\
     Campaign: {name}\n\
     Product: {product}\n\
     Brief: {brief}\n\
     Start date: {start}\n\
     End date: {end}\n\
     Sample link: {link}\n\n\
     Rules:\n\
     - Open with a friendly greeting that includes the {{name}} \
       placeholder.\n\
     - Mention the campaign name, the product, and the campaign period.\n\
     - List the creator's deliverables as short bullet points and add one \
       content idea.\n\
     - Put the sample link on its own line.\n\
     - Close with a call to action telling the creator to reply with \
       \"{join}\" and then request the sample via the link. Do not alter \
       \"{join}\".\n\
     - Use WhatsApp bold markers around the campaign name, product and \
       call to action, plus a few fitting emoji.\n\n\
     Output exactly one plain-text message. No JSON, no lists of \
     variants, no numbering.",
    name = campaign.name,
    product = campaign.product_name,
    brief = campaign.brief,
    link = campaign.link_sample,
    join = campaign.join_message,
  ))
}

pub struct Broadcast<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Broadcast<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Generates a message via the LLM and stores it on the tenant's
  /// singleton with status `ready`.
  pub async fn generate(
    &self,
    gemini: &Gemini,
    user_id: &str,
    req: GenerateMessage,
  ) -> Result<String> {
    let campaign =
      sv::Campaign::new(self.db).by_id(user_id, &req.campaign_id).await?;

    let prompt =
      build_prompt(&campaign, req.message_type, req.prompt.as_deref())?;
    let message = gemini.generate(&prompt).await?;

    self
      .upsert_message(
        user_id,
        &campaign.id,
        req.broadcast_group_id,
        req.achievement_status_filter,
        message.clone(),
        req.message_type,
        BroadcastStatus::Ready,
        None,
      )
      .await?;

    Ok(message)
  }

  /// Persists the broadcast as `sending` and hands fan-out to the workflow
  /// webhook. A webhook failure surfaces as an error but the persisted
  /// state is not rolled back.
  pub async fn send(
    &self,
    http: &Client,
    webhook_url: Option<&str>,
    user: &user::Model,
    req: SendBroadcast,
  ) -> Result<()> {
    let campaign =
      sv::Campaign::new(self.db).by_id(&user.id, &req.campaign_id).await?;

    if campaign.status == CampaignStatus::Inactive {
      return Err(Error::InvalidArgs("Campaign is inactive".into()));
    }

    let started_at = Utc::now().naive_utc();
    let message = self
      .upsert_message(
        &user.id,
        &campaign.id,
        Some(req.broadcast_group_id.clone()),
        Some(req.achievement_status.clone()),
        req.message,
        req.message_type,
        BroadcastStatus::Sending,
        Some(started_at),
      )
      .await?;

    info!(
      "triggering broadcast webhook for campaign {} ({})",
      campaign.name, campaign.id
    );

    let url = webhook_url.ok_or_else(|| {
      Error::Webhook("BROADCAST_WEBHOOK_URL is not configured".into())
    })?;

    let payload = json::json!({
      "userId": user.id,
      "userName": user.name,
      "campaignId": campaign.id,
      "campaignName": campaign.name,
      "broadcastGroupId": req.broadcast_group_id,
      "broadcastMessageId": message.user_id,
      "achievementStatus": req.achievement_status,
      "message": message.message,
      "timestamp": Utc::now().to_rfc3339(),
    });

    let response = http.post(url).json(&payload).send().await.map_err(|e| {
      Error::Webhook(format!("Failed to trigger broadcast: {e}"))
    })?;

    if !response.status().is_success() {
      return Err(Error::Webhook(format!(
        "Failed to trigger broadcast: {}",
        response.status()
      )));
    }

    Ok(())
  }

  pub async fn status(
    &self,
    user_id: &str,
  ) -> Result<Option<broadcast_message::Model>> {
    Ok(broadcast_message::Entity::find_by_id(user_id).one(self.db).await?)
  }

  pub async fn logs(
    &self,
    user_id: &str,
    campaign_id: Option<&str>,
    affiliator_id: Option<&str>,
  ) -> Result<Vec<broadcast_log::Model>> {
    let mut query = broadcast_log::Entity::find()
      .filter(broadcast_log::Column::UserId.eq(user_id));

    if let Some(id) = campaign_id {
      query = query.filter(broadcast_log::Column::CampaignId.eq(id));
    }
    if let Some(id) = affiliator_id {
      query = query.filter(broadcast_log::Column::AffiliatorId.eq(id));
    }

    Ok(
      query
        .order_by_desc(broadcast_log::Column::UpdatedAt)
        .all(self.db)
        .await?,
    )
  }

  #[allow(clippy::too_many_arguments)]
  async fn upsert_message(
    &self,
    user_id: &str,
    campaign_id: &str,
    broadcast_group_id: Option<String>,
    achievement_status_filter: Option<String>,
    message: String,
    message_type: MessageType,
    status: BroadcastStatus,
    started_at: Option<DateTime>,
  ) -> Result<broadcast_message::Model> {
    let now = Utc::now().naive_utc();
    let existing =
      broadcast_message::Entity::find_by_id(user_id).one(self.db).await?;

    let model = match existing {
      Some(existing) => {
        let mut model = broadcast_message::ActiveModel::from(existing);
        model.campaign_id = Set(Some(campaign_id.to_string()));
        model.broadcast_group_id = Set(broadcast_group_id);
        model.achievement_status_filter = Set(achievement_status_filter);
        model.message = Set(message);
        model.message_type = Set(message_type);
        model.status = Set(status);
        if started_at.is_some() {
          model.started_at = Set(started_at);
        }
        model.updated_at = Set(now);
        model.update(self.db).await?
      }
      None => {
        broadcast_message::ActiveModel {
          user_id: Set(user_id.to_string()),
          campaign_id: Set(Some(campaign_id.to_string())),
          broadcast_group_id: Set(broadcast_group_id),
          achievement_status_filter: Set(achievement_status_filter),
          message: Set(message),
          message_type: Set(message_type),
          status: Set(status),
          started_at: Set(started_at),
          completed_at: Set(None),
          created_at: Set(now),
          updated_at: Set(now),
        }
        .insert(self.db)
        .await?
      }
    };

    Ok(model)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::entity::affiliator;
  use crate::sv::{campaign::fixture, test_utils::test_db};
  use uuid::Uuid;

  #[tokio::test]
  async fn test_build_prompt_recruitment() {
    let db = test_db::setup().await;
    let campaign = sv::Campaign::new(&db)
      .create("u1", fixture(&["SKU-A"], CampaignStatus::Active))
      .await
      .unwrap();

    let prompt =
      build_prompt(&campaign, MessageType::Recruitment, None).unwrap();

    assert!(prompt.contains("Summer Launch"));
    assert!(prompt.contains("Serum"));
    assert!(prompt.contains("JOIN SUMMER"));
    assert!(prompt.contains("https://shop.example.com/sample"));
  }

  #[tokio::test]
  async fn test_build_prompt_custom_requires_prompt() {
    let db = test_db::setup().await;
    let campaign = sv::Campaign::new(&db)
      .create("u1", fixture(&["SKU-A"], CampaignStatus::Active))
      .await
      .unwrap();

    assert!(matches!(
      build_prompt(&campaign, MessageType::Custom, None),
      Err(Error::InvalidArgs(_))
    ));

    let prompt =
      build_prompt(&campaign, MessageType::Custom, Some("invite warmly"))
        .unwrap();
    assert!(prompt.contains("invite warmly"));
  }

  #[tokio::test]
  async fn test_upsert_message_is_singleton() {
    let db = test_db::setup().await;
    let sv = Broadcast::new(&db);

    sv.upsert_message(
      "u1",
      "c1",
      None,
      None,
      "draft one".into(),
      MessageType::Recruitment,
      BroadcastStatus::Ready,
      None,
    )
    .await
    .unwrap();

    let started = Utc::now().naive_utc();
    sv.upsert_message(
      "u1",
      "c2",
      Some("default".into()),
      Some("all".into()),
      "draft two".into(),
      MessageType::Custom,
      BroadcastStatus::Sending,
      Some(started),
    )
    .await
    .unwrap();

    let all = broadcast_message::Entity::find().all(&db).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].message, "draft two");
    assert_eq!(all[0].campaign_id.as_deref(), Some("c2"));
    assert_eq!(all[0].status, BroadcastStatus::Sending);
    assert!(all[0].started_at.is_some());
  }

  #[tokio::test]
  async fn test_logs_filter_by_campaign_and_affiliator() {
    let db = test_db::setup().await;
    let now = Utc::now().naive_utc();

    // broadcast_logs carries foreign keys to campaigns and affiliators, so
    // the referenced rows must exist before the logs are inserted.
    for id in ["c1", "c2"] {
      campaign::ActiveModel {
        id: Set(id.into()),
        user_id: Set("u1".into()),
        name: Set(format!("Campaign {id}")),
        product_name: Set("Serum".into()),
        sku_array: Set(Default::default()),
        link_sample: Set(String::new()),
        product_qty: Set(0),
        brief: Set(String::new()),
        video_qty: Set(0),
        join_message: Set(String::new()),
        start_date: Set(now),
        end_date: Set(now),
        status: Set(CampaignStatus::Active),
        auto_messages: Set(Default::default()),
        affiliator_count: Set(0),
        sample_sent_count: Set(0),
        video_count: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
      }
      .insert(&db)
      .await
      .unwrap();
    }

    for id in ["a1", "a2"] {
      affiliator::ActiveModel {
        id: Set(id.into()),
        user_id: Set("u1".into()),
        tiktok_username: Set(id.into()),
        name: Set(format!("Affiliator {id}")),
        phone_number: Set("628123456789".into()),
        quality_score: Set(0),
        total_campaigns: Set(0),
        notes: Set(String::new()),
        created_at: Set(now),
        updated_at: Set(now),
      }
      .insert(&db)
      .await
      .unwrap();
    }

    for (campaign_id, affiliator_id) in
      [("c1", "a1"), ("c1", "a2"), ("c2", "a1")]
    {
      broadcast_log::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        user_id: Set("u1".into()),
        campaign_id: Set(campaign_id.into()),
        affiliator_id: Set(affiliator_id.into()),
        is_join: Set(false),
        join_confirmation_date: Set(None),
        content_progress: Set(0),
        achievement_status: Set(Default::default()),
        created_at: Set(now),
        updated_at: Set(now),
      }
      .insert(&db)
      .await
      .unwrap();
    }

    let sv = Broadcast::new(&db);
    assert_eq!(sv.logs("u1", None, None).await.unwrap().len(), 3);
    assert_eq!(sv.logs("u1", Some("c1"), None).await.unwrap().len(), 2);
    assert_eq!(
      sv.logs("u1", Some("c1"), Some("a2")).await.unwrap().len(),
      1
    );
    assert!(sv.logs("u2", None, None).await.unwrap().is_empty());
  }
}
