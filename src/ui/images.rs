//! Terminal image protocols for thumbnails and lightbox images, keyed by URL.

use std::collections::{HashMap, HashSet};
use std::sync::{mpsc, Arc};

use image::DynamicImage;
use ratatui_image::{picker::Picker, protocol::StatefulProtocol};
use tracing::debug;

use crate::config::ImageProtocol;
use crate::drive::DriveApi;

pub struct ImageCache {
    /// Image picker for protocol detection
    picker: Option<Picker>,
    api: Arc<dyn DriveApi>,
    protocols: HashMap<String, StatefulProtocol>,
    /// URLs currently being fetched
    loading: HashSet<String>,
    /// URLs whose fetch or decode failed
    failed: HashSet<String>,
    receiver: mpsc::Receiver<(String, Option<DynamicImage>)>,
    sender: mpsc::Sender<(String, Option<DynamicImage>)>,
}

impl ImageCache {
    pub fn new(protocol: ImageProtocol, api: Arc<dyn DriveApi>) -> Self {
        let picker = Self::create_picker(protocol);
        let (sender, receiver) = mpsc::channel();
        Self {
            picker,
            api,
            protocols: HashMap::new(),
            loading: HashSet::new(),
            failed: HashSet::new(),
            receiver,
            sender,
        }
    }

    fn create_picker(protocol: ImageProtocol) -> Option<Picker> {
        match protocol {
            ImageProtocol::None => None,
            _ => Picker::from_query_stdio().ok(),
        }
    }

    /// Whether the terminal can show images at all.
    pub fn is_available(&self) -> bool {
        self.picker.is_some()
    }

    /// Drop every cached protocol, e.g. when a new folder replaces the view.
    pub fn clear(&mut self) {
        self.protocols.clear();
        self.loading.clear();
        self.failed.clear();
    }

    /// Register an already decoded image.
    pub fn insert(&mut self, url: String, img: DynamicImage) {
        if let Some(ref mut picker) = self.picker {
            let protocol = picker.new_resize_protocol(img);
            self.protocols.insert(url, protocol);
        }
    }

    /// Poll for completed async loads
    pub fn poll_async_loads(&mut self) {
        while let Ok((url, img)) = self.receiver.try_recv() {
            self.loading.remove(&url);
            match img {
                Some(img) => self.insert(url, img),
                None => {
                    self.failed.insert(url);
                }
            }
        }
    }

    /// Start fetching `url` in the background unless it is cached, loading or
    /// known to be broken.
    pub fn request(&mut self, url: &str) {
        if self.picker.is_none()
            || self.protocols.contains_key(url)
            || self.loading.contains(url)
            || self.failed.contains(url)
        {
            return;
        }

        self.loading.insert(url.to_string());
        let url = url.to_string();
        let api = Arc::clone(&self.api);
        let sender = self.sender.clone();

        std::thread::spawn(move || {
            let img = api
                .fetch_bytes(&url)
                .map_err(|e| e.to_string())
                .and_then(|bytes| image::load_from_memory(&bytes).map_err(|e| e.to_string()));
            let img = match img {
                Ok(img) => Some(img),
                Err(e) => {
                    debug!(%url, "Image load failed: {}", e);
                    None
                }
            };
            let _ = sender.send((url, img));
        });
    }

    pub fn get_mut(&mut self, url: &str) -> Option<&mut StatefulProtocol> {
        self.protocols.get_mut(url)
    }

    pub fn is_loading(&self, url: &str) -> bool {
        self.loading.contains(url)
    }

    pub fn is_failed(&self, url: &str) -> bool {
        self.failed.contains(url)
    }
}
