//! Data transfer objects for request bodies and responses.

pub mod request;
pub mod response;
