pub mod affiliator;
pub mod auth;
pub mod broadcast;
pub mod campaign;
pub mod gemini;
pub mod group;
pub mod sample;
#[cfg(test)]
pub mod test_utils;
pub mod user;
pub mod whatsapp;

pub use affiliator::Affiliator;
pub use auth::Auth;
pub use broadcast::Broadcast;
pub use campaign::Campaign;
pub use gemini::Gemini;
pub use group::Group;
pub use sample::Sample;
pub use user::User;
pub use whatsapp::Whatsapp;
