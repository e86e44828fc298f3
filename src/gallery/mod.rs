//! Folder loading: turning a Drive folder into something the UI can show.

pub mod classify;
pub mod loader;
pub mod preload;

use image::DynamicImage;

use crate::drive::RemoteEntry;

pub use classify::{plan_folder, FolderPlan};
pub use loader::{FolderLoader, ThumbnailWidths};
pub use preload::{PreloadTarget, Preloaded, Preloader, ThumbnailCache};

/// Per-load display options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewOptions {
    /// Extract a cover and show the rest as full-size pages
    pub is_book: bool,
    /// Fetch and show a description text file
    pub show_text: bool,
}

impl ViewOptions {
    pub fn grid() -> Self {
        Self {
            is_book: false,
            show_text: true,
        }
    }

    pub fn book() -> Self {
        Self {
            is_book: true,
            show_text: true,
        }
    }

    /// The root folder: plain grid, no description.
    pub fn portfolio() -> Self {
        Self {
            is_book: false,
            show_text: false,
        }
    }
}

/// An image with its thumbnail URL and, if the preload succeeded, the decoded
/// thumbnail.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub entry: RemoteEntry,
    pub url: String,
    /// Whether the preload succeeded
    pub ready: bool,
    image: Option<DynamicImage>,
}

impl Thumbnail {
    pub fn new(entry: RemoteEntry, url: String, image: Option<DynamicImage>) -> Self {
        Self {
            entry,
            url,
            ready: image.is_some(),
            image,
        }
    }

    fn take_image(&mut self) -> Option<(String, DynamicImage)> {
        self.image.take().map(|img| (self.url.clone(), img))
    }
}

/// A grid tile. `index` is the image's position in the lightbox set.
#[derive(Debug, Clone)]
pub struct Tile {
    pub index: usize,
    pub thumbnail: Thumbnail,
}

#[derive(Debug, Clone)]
pub enum ImageArea {
    /// Book pages in sequence order, not selectable
    Pages(Vec<Thumbnail>),
    /// Selectable grid tiles
    Tiles(Vec<Tile>),
}

impl ImageArea {
    pub fn len(&self) -> usize {
        match self {
            ImageArea::Pages(pages) => pages.len(),
            ImageArea::Tiles(tiles) => tiles.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn thumbnails(&self) -> Vec<&Thumbnail> {
        match self {
            ImageArea::Pages(pages) => pages.iter().collect(),
            ImageArea::Tiles(tiles) => tiles.iter().map(|t| &t.thumbnail).collect(),
        }
    }

    fn thumbnails_mut(&mut self) -> Vec<&mut Thumbnail> {
        match self {
            ImageArea::Pages(pages) => pages.iter_mut().collect(),
            ImageArea::Tiles(tiles) => tiles.iter_mut().map(|t| &mut t.thumbnail).collect(),
        }
    }
}

/// Everything a loaded folder displays.
#[derive(Debug, Clone)]
pub struct FolderView {
    pub folder_id: String,
    pub options: ViewOptions,
    pub cover: Option<Thumbnail>,
    /// Description text, present only when the fetch succeeded
    pub description: Option<String>,
    pub area: ImageArea,
}

impl FolderView {
    pub fn empty(folder_id: &str, options: ViewOptions) -> Self {
        let area = if options.is_book {
            ImageArea::Pages(Vec::new())
        } else {
            ImageArea::Tiles(Vec::new())
        };
        Self {
            folder_id: folder_id.to_string(),
            options,
            cover: None,
            description: None,
            area,
        }
    }

    /// Assemble a view from a plan and its preloaded thumbnails.
    pub fn from_parts(
        folder_id: &str,
        options: ViewOptions,
        cover: Option<Thumbnail>,
        images: Vec<Thumbnail>,
        description: Option<String>,
    ) -> Self {
        let area = if options.is_book {
            ImageArea::Pages(images)
        } else {
            ImageArea::Tiles(
                images
                    .into_iter()
                    .enumerate()
                    .map(|(index, thumbnail)| Tile { index, thumbnail })
                    .collect(),
            )
        };
        Self {
            folder_id: folder_id.to_string(),
            options,
            cover,
            description,
            area,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cover.is_none() && self.description.is_none() && self.area.is_empty()
    }

    /// The lightbox image set: every image except the cover, in order.
    pub fn images(&self) -> Vec<RemoteEntry> {
        self.area
            .thumbnails()
            .into_iter()
            .map(|t| t.entry.clone())
            .collect()
    }

    pub fn description_html(&self) -> Option<String> {
        self.description.as_deref().map(crate::html::text_to_html)
    }

    /// Move decoded thumbnails out of the view, keyed by URL.
    pub fn take_images(&mut self) -> Vec<(String, DynamicImage)> {
        let mut taken: Vec<(String, DynamicImage)> = self
            .cover
            .as_mut()
            .and_then(Thumbnail::take_image)
            .into_iter()
            .collect();
        taken.extend(
            self.area
                .thumbnails_mut()
                .into_iter()
                .filter_map(Thumbnail::take_image),
        );
        taken
    }
}
