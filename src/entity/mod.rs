pub mod affiliator;
pub mod broadcast_group;
pub mod broadcast_log;
pub mod broadcast_message;
pub mod campaign;
pub mod sample_request;
pub mod session;
pub mod user;

pub use broadcast_log::AchievementStatus;
pub use broadcast_message::{BroadcastStatus, MessageType};
pub use campaign::CampaignStatus;
pub use user::{SubscriptionStatus, UserRole, UserTier};
