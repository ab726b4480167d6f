//! Notification preferences - per-user channel toggles and notify-at levels.

mod notifications_model;
mod notifications_service;
mod notifications_traits;

pub use notifications_model::{
    NotificationChannel, NotificationPreference, NotificationPreferenceUpdate,
};
pub use notifications_service::NotificationService;
pub use notifications_traits::{NotificationRepositoryTrait, NotificationServiceTrait};
