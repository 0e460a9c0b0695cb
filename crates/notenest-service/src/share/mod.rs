//! Share links: issue tokens, redeem them within limits, clean them up.

pub mod access;
pub mod link;
pub mod service;

pub use access::{AccessService, ConsumeResult, SharedItem};
pub use link::LinkService;
pub use service::{CreateLinkRequest, CreatedLink, ShareService};
