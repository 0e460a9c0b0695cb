//! # notenest-service
//!
//! Business logic service layer for NoteNest. Each service orchestrates
//! repositories, object storage, and external APIs to implement one
//! application-level use case.
//!
//! Services follow constructor injection: every dependency is provided at
//! construction time via `Arc` references.

pub mod document;
pub mod note;
pub mod notification;
pub mod share;
pub mod site;
pub mod spotify;

pub use document::{DocumentService, DownloadResult, UploadRequest};
pub use note::{CreateNoteRequest, NoteService, UpdateNoteRequest};
pub use notification::NotificationService;
pub use share::{
    AccessService, ConsumeResult, CreateLinkRequest, CreatedLink, LinkService, ShareService,
    SharedItem,
};
pub use site::SiteService;
pub use spotify::{SpotifyClient, TokenSet};
