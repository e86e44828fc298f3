//! In-memory [`DriveApi`] for tests.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;

use image::{DynamicImage, ImageFormat, RgbImage};

use super::client::DriveApi;
use super::error::DriveError;
use super::types::{ChildFilter, RemoteFile, ShortcutDetails, FOLDER_MIME, SHORTCUT_MIME};

#[derive(Default)]
pub struct FakeDrive {
    children: HashMap<String, Vec<RemoteFile>>,
    texts: HashMap<String, String>,
    images: HashMap<String, Vec<u8>>,
    /// Every file id whose text was requested, in order.
    pub text_requests: Mutex<Vec<String>>,
}

impl FakeDrive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folder(mut self, id: &str, files: Vec<RemoteFile>) -> Self {
        self.children.insert(id.to_string(), files);
        self
    }

    pub fn with_text(mut self, file_id: &str, text: &str) -> Self {
        self.texts.insert(file_id.to_string(), text.to_string());
        self
    }

    pub fn with_image(mut self, url: &str) -> Self {
        self.images.insert(url.to_string(), png_bytes());
        self
    }

    pub fn requested_texts(&self) -> Vec<String> {
        self.text_requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl DriveApi for FakeDrive {
    fn list_children(&self, parent_id: &str, filter: ChildFilter) -> Result<Vec<RemoteFile>, DriveError> {
        let files = self.children.get(parent_id).ok_or_else(|| DriveError::Status {
            status: 404,
            url: format!("fake://files/{}", parent_id),
        })?;

        Ok(files
            .iter()
            .filter(|f| filter == ChildFilter::All || f.is_folder())
            .cloned()
            .collect())
    }

    fn file_text(&self, file_id: &str) -> Result<String, DriveError> {
        if let Ok(mut requests) = self.text_requests.lock() {
            requests.push(file_id.to_string());
        }
        self.texts.get(file_id).cloned().ok_or_else(|| DriveError::Status {
            status: 404,
            url: format!("fake://files/{}", file_id),
        })
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, DriveError> {
        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| DriveError::Transport(format!("no image at {}", url)))
    }
}

pub fn file(id: &str, name: &str, mime_type: &str) -> RemoteFile {
    RemoteFile {
        id: id.to_string(),
        name: name.to_string(),
        mime_type: mime_type.to_string(),
        shortcut_details: None,
    }
}

pub fn folder(id: &str, name: &str) -> RemoteFile {
    file(id, name, FOLDER_MIME)
}

pub fn image(id: &str, name: &str) -> RemoteFile {
    file(id, name, "image/jpeg")
}

pub fn shortcut(id: &str, name: &str, target_id: Option<&str>, target_mime: Option<&str>) -> RemoteFile {
    RemoteFile {
        id: id.to_string(),
        name: name.to_string(),
        mime_type: SHORTCUT_MIME.to_string(),
        shortcut_details: Some(ShortcutDetails {
            target_id: target_id.map(str::to_string),
            target_mime_type: target_mime.map(str::to_string),
        }),
    }
}

/// A tiny valid PNG.
pub fn png_bytes() -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::new(2, 2));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .expect("encoding a 2x2 png cannot fail");
    buf.into_inner()
}
