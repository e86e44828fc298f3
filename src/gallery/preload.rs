//! Best-effort thumbnail preloading with an optional on-disk cache.

use std::path::PathBuf;
use std::sync::Arc;

use image::DynamicImage;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::drive::DriveApi;

/// A thumbnail to fetch ahead of display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadTarget {
    pub file_id: String,
    pub width: u32,
    pub url: String,
}

/// Outcome of one preload. Failures are values, never errors.
#[derive(Debug, Clone)]
pub struct Preloaded {
    pub url: String,
    pub image: Option<DynamicImage>,
}

impl Preloaded {
    pub fn ok(&self) -> bool {
        self.image.is_some()
    }
}

/// Thumbnails on disk, keyed by file id and width.
#[derive(Debug, Clone)]
pub struct ThumbnailCache {
    dir: Option<PathBuf>,
}

impl ThumbnailCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir: Some(dir) }
    }

    pub fn disabled() -> Self {
        Self { dir: None }
    }

    fn path_for(&self, target: &PreloadTarget) -> Option<PathBuf> {
        // Drive ids are URL-safe base64; anything else is not cached.
        let safe = !target.file_id.is_empty()
            && target
                .file_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !safe {
            return None;
        }
        self.dir
            .as_ref()
            .map(|dir| dir.join(format!("{}-w{}.thumb", target.file_id, target.width)))
    }

    pub fn get(&self, target: &PreloadTarget) -> Option<Vec<u8>> {
        let path = self.path_for(target)?;
        std::fs::read(path).ok()
    }

    pub fn put(&self, target: &PreloadTarget, bytes: &[u8]) {
        let Some(path) = self.path_for(target) else {
            return;
        };
        let result = path
            .parent()
            .map(std::fs::create_dir_all)
            .unwrap_or(Ok(()))
            .and_then(|_| std::fs::write(&path, bytes));
        if let Err(e) = result {
            warn!("Failed to cache thumbnail {:?}: {}", path, e);
        }
    }
}

/// Fetches and decodes thumbnails in parallel.
#[derive(Clone)]
pub struct Preloader {
    api: Arc<dyn DriveApi>,
    cache: ThumbnailCache,
}

impl Preloader {
    pub fn new(api: Arc<dyn DriveApi>, cache: ThumbnailCache) -> Self {
        Self { api, cache }
    }

    /// Preload one thumbnail. Never fails; a broken image is `ok() == false`.
    pub fn preload(&self, target: &PreloadTarget) -> Preloaded {
        if let Some(bytes) = self.cache.get(target) {
            if let Ok(img) = image::load_from_memory(&bytes) {
                return Preloaded {
                    url: target.url.clone(),
                    image: Some(img),
                };
            }
            debug!(file_id = %target.file_id, "Ignoring undecodable cached thumbnail");
        }

        let image = match self.api.fetch_bytes(&target.url) {
            Ok(bytes) => match image::load_from_memory(&bytes) {
                Ok(img) => {
                    self.cache.put(target, &bytes);
                    Some(img)
                }
                Err(e) => {
                    debug!(file_id = %target.file_id, "Thumbnail did not decode: {}", e);
                    None
                }
            },
            Err(e) => {
                debug!(file_id = %target.file_id, "Thumbnail preload failed: {}", e);
                None
            }
        };

        Preloaded {
            url: target.url.clone(),
            image,
        }
    }

    /// Preload all targets concurrently. Results keep the input order.
    pub fn preload_all(&self, targets: &[PreloadTarget]) -> Vec<Preloaded> {
        targets.par_iter().map(|t| self.preload(t)).collect()
    }
}
