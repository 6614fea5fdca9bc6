pub mod achievements;
pub mod auth;
pub mod export;
pub mod fallback;
pub mod health;
pub mod knowledge;
pub mod metrics;
pub mod notifications;
pub mod profile;
pub mod tests;
