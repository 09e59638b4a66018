pub mod notification_models;
pub mod notification_service;

pub use notification_models::{FlagChange, NotificationPreferences};
pub use notification_service::NotificationService;
