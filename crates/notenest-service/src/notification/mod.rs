//! Site notifications.

pub mod service;

pub use service::NotificationService;
