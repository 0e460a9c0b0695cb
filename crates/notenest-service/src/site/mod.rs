//! Site content: configuration values, realtime commands, stories.

pub mod service;

pub use service::SiteService;
