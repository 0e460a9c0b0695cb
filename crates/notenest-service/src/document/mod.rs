//! Uploaded document management: upload, listing, URL resolution, download.

pub mod service;

pub use service::{DocumentService, DownloadResult, UploadRequest};
