use std::io::Read;
use std::time::Duration;

use tracing::{debug, warn};

use super::error::DriveError;
use super::types::{ChildFilter, FileList, RemoteFile, FOLDER_MIME};
use crate::config::DriveConfig;

/// Page size requested from `files.list`. Further pages are not followed.
const PAGE_SIZE: &str = "1000";

/// Upper bound on a single downloaded thumbnail.
const MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

/// The storage operations the gallery needs.
pub trait DriveApi: Send + Sync {
    /// List the non-trashed direct children of a folder.
    fn list_children(&self, parent_id: &str, filter: ChildFilter) -> Result<Vec<RemoteFile>, DriveError>;

    /// Download a small file as text.
    fn file_text(&self, file_id: &str) -> Result<String, DriveError>;

    /// Fetch raw bytes from a URL (thumbnails).
    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, DriveError>;
}

/// Public thumbnail endpoint URL for a file at the requested pixel width.
pub fn thumbnail_url(base: &str, file_id: &str, width: u32) -> String {
    format!("{}?id={}&sz=w{}", base, file_id, width)
}

/// Build the `q` expression for a children listing.
pub fn children_query(parent_id: &str, filter: ChildFilter) -> String {
    let parent = parent_id.replace('\\', "\\\\").replace('\'', "\\'");
    match filter {
        ChildFilter::All => format!("'{}' in parents and trashed = false", parent),
        ChildFilter::FoldersOnly => format!(
            "'{}' in parents and mimeType = '{}' and trashed = false",
            parent, FOLDER_MIME
        ),
    }
}

/// Drive v3 client authenticated with an API key.
#[derive(Clone)]
pub struct DriveClient {
    agent: ureq::Agent,
    api_base: String,
    api_key: Option<String>,
}

impl DriveClient {
    pub fn new(api_base: &str, api_key: Option<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_config(config: &DriveConfig) -> Self {
        Self::new(
            &config.api_base,
            config.resolved_api_key(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn key(&self) -> Result<&str, DriveError> {
        self.api_key.as_deref().ok_or(DriveError::MissingApiKey)
    }
}

impl DriveApi for DriveClient {
    fn list_children(&self, parent_id: &str, filter: ChildFilter) -> Result<Vec<RemoteFile>, DriveError> {
        let key = self.key()?;
        let query = children_query(parent_id, filter);
        let url = format!("{}/files", self.api_base);

        debug!(parent_id, ?filter, "Listing Drive folder");

        let list: FileList = self
            .agent
            .get(&url)
            .query("key", key)
            .query("includeItemsFromAllDrives", "true")
            .query("supportsAllDrives", "true")
            .query("pageSize", PAGE_SIZE)
            .query("q", &query)
            .query("fields", filter.fields())
            .call()?
            .into_json()?;

        if list.next_page_token.is_some() {
            warn!(
                parent_id,
                count = list.files.len(),
                "Folder has more entries than one page; showing the first page only"
            );
        }

        Ok(list.files)
    }

    fn file_text(&self, file_id: &str) -> Result<String, DriveError> {
        let key = self.key()?;
        let url = format!("{}/files/{}", self.api_base, file_id);

        let text = self
            .agent
            .get(&url)
            .query("alt", "media")
            .query("key", key)
            .call()?
            .into_string()?;

        Ok(text)
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, DriveError> {
        let response = self.agent.get(url).call()?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_IMAGE_BYTES)
            .read_to_end(&mut bytes)?;

        Ok(bytes)
    }
}
