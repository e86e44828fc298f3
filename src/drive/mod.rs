//! Google Drive v3 access: the wire types, the HTTP client and the
//! [`DriveApi`] seam the rest of the crate talks to.

pub mod client;
pub mod error;
#[cfg(test)]
pub mod fake;
pub mod types;

pub use client::{children_query, thumbnail_url, DriveApi, DriveClient};
pub use error::DriveError;
pub use types::{ChildFilter, FolderLink, RemoteEntry, RemoteFile, ShortcutDetails};
