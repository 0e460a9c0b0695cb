//! HTTP request handlers, one module per domain.

pub mod document;
pub mod health;
pub mod note;
pub mod notification;
pub mod share;
pub mod site;
pub mod spotify;
pub mod story;
pub mod ws;
