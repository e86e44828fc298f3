use serde::{Deserialize, Serialize};

pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";
pub const SHORTCUT_MIME: &str = "application/vnd.google-apps.shortcut";

/// A file as returned by `files.list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub shortcut_details: Option<ShortcutDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutDetails {
    #[serde(default)]
    pub target_id: Option<String>,
    #[serde(default)]
    pub target_mime_type: Option<String>,
}

impl RemoteFile {
    pub fn is_shortcut(&self) -> bool {
        self.mime_type == SHORTCUT_MIME
    }

    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME
    }
}

/// Response body of `files.list`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileList {
    #[serde(default)]
    pub files: Vec<RemoteFile>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// A file after shortcut resolution. `id` and `mime_type` always describe the
/// content itself, never a shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteEntry {
    pub id: String,
    pub name: String,
    pub mime_type: String,
}

/// A folder reachable from the navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderLink {
    pub id: String,
    pub name: String,
}

impl From<RemoteFile> for FolderLink {
    fn from(file: RemoteFile) -> Self {
        Self {
            id: file.id,
            name: file.name,
        }
    }
}

/// Which children a listing should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildFilter {
    All,
    FoldersOnly,
}

impl ChildFilter {
    /// Partial-response field mask for this listing.
    pub fn fields(&self) -> &'static str {
        match self {
            ChildFilter::All => "files(id,name,mimeType,shortcutDetails),nextPageToken",
            ChildFilter::FoldersOnly => "files(id,name,mimeType),nextPageToken",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_list_parses_shortcuts() {
        let body = r#"{
            "files": [
                {"id": "a", "name": "cover.png", "mimeType": "image/png"},
                {"id": "b", "name": "link", "mimeType": "application/vnd.google-apps.shortcut",
                 "shortcutDetails": {"targetId": "t", "targetMimeType": "image/jpeg"}},
                {"id": "c"}
            ],
            "nextPageToken": "more"
        }"#;

        let list: FileList = serde_json::from_str(body).unwrap();
        assert_eq!(list.files.len(), 3);
        assert!(list.files[1].is_shortcut());
        let details = list.files[1].shortcut_details.as_ref().unwrap();
        assert_eq!(details.target_id.as_deref(), Some("t"));
        assert_eq!(details.target_mime_type.as_deref(), Some("image/jpeg"));
        assert_eq!(list.files[2].name, "");
        assert_eq!(list.next_page_token.as_deref(), Some("more"));
    }

    #[test]
    fn test_empty_body_is_empty_list() {
        let list: FileList = serde_json::from_str("{}").unwrap();
        assert!(list.files.is_empty());
        assert!(list.next_page_token.is_none());
    }
}
