//! The folder loader: list, resolve, classify, preload, fetch description.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::classify::plan_folder;
use super::preload::{PreloadTarget, Preloader};
use super::{FolderView, Thumbnail, ViewOptions};
use crate::config::ThumbnailConfig;
use crate::drive::{thumbnail_url, ChildFilter, DriveApi, RemoteEntry};

/// Requested thumbnail widths in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailWidths {
    pub grid: u32,
    pub book: u32,
    pub cover: u32,
    pub lightbox: u32,
}

impl Default for ThumbnailWidths {
    fn default() -> Self {
        Self {
            grid: 400,
            book: 800,
            cover: 600,
            lightbox: 1200,
        }
    }
}

impl From<&ThumbnailConfig> for ThumbnailWidths {
    fn from(config: &ThumbnailConfig) -> Self {
        Self {
            grid: config.grid_width,
            book: config.book_width,
            cover: config.cover_width,
            lightbox: config.lightbox_width,
        }
    }
}

pub struct FolderLoader {
    api: Arc<dyn DriveApi>,
    preloader: Preloader,
    thumbnail_base: String,
    widths: ThumbnailWidths,
}

impl FolderLoader {
    pub fn new(
        api: Arc<dyn DriveApi>,
        preloader: Preloader,
        thumbnail_base: &str,
        widths: ThumbnailWidths,
    ) -> Self {
        Self {
            api,
            preloader,
            thumbnail_base: thumbnail_base.to_string(),
            widths,
        }
    }

    pub fn widths(&self) -> ThumbnailWidths {
        self.widths
    }

    pub fn thumbnail_url(&self, file_id: &str, width: u32) -> String {
        thumbnail_url(&self.thumbnail_base, file_id, width)
    }

    /// URL for the full-size lightbox rendering of an image.
    pub fn lightbox_url(&self, entry: &RemoteEntry) -> String {
        self.thumbnail_url(&entry.id, self.widths.lightbox)
    }

    fn target(&self, entry: &RemoteEntry, width: u32) -> PreloadTarget {
        PreloadTarget {
            file_id: entry.id.clone(),
            width,
            url: self.thumbnail_url(&entry.id, width),
        }
    }

    /// Load a folder into a view. Never fails: errors are logged and the view
    /// is left partial or empty.
    pub fn load(&self, folder_id: &str, options: ViewOptions) -> FolderView {
        info!(folder_id, ?options, "Loading folder");

        let files = match self.api.list_children(folder_id, ChildFilter::All) {
            Ok(files) => files,
            Err(e) => {
                error!(folder_id, "Error loading folder: {}", e);
                return FolderView::empty(folder_id, options);
            }
        };

        debug!(folder_id, count = files.len(), "Folder listing received");

        if files.is_empty() {
            return FolderView::empty(folder_id, options);
        }

        let plan = plan_folder(files, options);

        let page_width = if options.is_book {
            self.widths.book
        } else {
            self.widths.grid
        };

        let mut targets = Vec::with_capacity(plan.images.len() + 1);
        if let Some(ref cover) = plan.cover {
            targets.push(self.target(cover, self.widths.cover));
        }
        targets.extend(plan.images.iter().map(|e| self.target(e, page_width)));

        // Thumbnails and description are fetched together; neither waits on
        // the other and neither can fail the load.
        let (preloaded, description) = rayon::join(
            || self.preloader.preload_all(&targets),
            || plan.description_source.as_ref().and_then(|f| self.fetch_description(f)),
        );

        let failed = preloaded.iter().filter(|p| !p.ok()).count();
        if failed > 0 {
            debug!(folder_id, failed, "Some thumbnails failed to preload");
        }

        let mut preloaded = preloaded.into_iter();
        let cover = plan.cover.map(|entry| {
            let result = preloaded.next();
            let url = self.thumbnail_url(&entry.id, self.widths.cover);
            Thumbnail::new(entry, url, result.and_then(|p| p.image))
        });
        let images: Vec<Thumbnail> = plan
            .images
            .into_iter()
            .map(|entry| {
                let result = preloaded.next();
                let url = self.thumbnail_url(&entry.id, page_width);
                Thumbnail::new(entry, url, result.and_then(|p| p.image))
            })
            .collect();

        info!(
            folder_id,
            images = images.len(),
            cover = cover.is_some(),
            description = description.is_some(),
            "Folder loaded"
        );

        FolderView::from_parts(folder_id, options, cover, images, description)
    }

    fn fetch_description(&self, file: &RemoteEntry) -> Option<String> {
        match self.api.file_text(&file.id) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(file_id = %file.id, name = %file.name, "Failed to fetch description: {}", e);
                None
            }
        }
    }
}
