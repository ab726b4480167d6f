//! SQLite storage implementation for notification preferences.

mod model;
mod repository;

pub use model::NotificationPreferenceDB;
pub use repository::NotificationRepository;
