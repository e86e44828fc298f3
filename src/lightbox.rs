//! Lightbox: a modal viewer over the current folder's images.

use crossterm::event::KeyCode;
use tracing::{debug, warn};

use crate::drive::RemoteEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxCommand {
    Close,
    Prev,
    Next,
}

/// Key bindings while the lightbox is open.
pub fn command_for_key(code: KeyCode) -> Option<LightboxCommand> {
    match code {
        KeyCode::Esc | KeyCode::Char('q') => Some(LightboxCommand::Close),
        KeyCode::Left | KeyCode::Char('h') => Some(LightboxCommand::Prev),
        KeyCode::Right | KeyCode::Char('l') => Some(LightboxCommand::Next),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightboxState {
    #[default]
    Closed,
    Open { index: usize },
}

/// The active image set and which one is showing.
///
/// Invariant: when open, the index is valid for `images`.
#[derive(Debug, Clone, Default)]
pub struct Lightbox {
    images: Vec<RemoteEntry>,
    state: LightboxState,
}

impl Lightbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the image set wholesale. Closes the lightbox.
    pub fn set_images(&mut self, images: Vec<RemoteEntry>) {
        self.images = images;
        self.state = LightboxState::Closed;
    }

    pub fn images(&self) -> &[RemoteEntry] {
        &self.images
    }

    pub fn state(&self) -> LightboxState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, LightboxState::Open { .. })
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            LightboxState::Open { index } => Some(index),
            LightboxState::Closed => None,
        }
    }

    pub fn current(&self) -> Option<&RemoteEntry> {
        self.current_index().and_then(|i| self.images.get(i))
    }

    /// Open at `index`. Returns false (and stays closed) if there is no such
    /// image.
    pub fn open(&mut self, index: usize) -> bool {
        if index >= self.images.len() {
            warn!(index, count = self.images.len(), "Lightbox open ignored: no such image");
            return false;
        }
        debug!(index, "Lightbox opened");
        self.state = LightboxState::Open { index };
        true
    }

    pub fn close(&mut self) {
        self.state = LightboxState::Closed;
    }

    pub fn prev(&mut self) {
        let n = self.images.len();
        if n == 0 {
            return;
        }
        if let LightboxState::Open { index } = self.state {
            self.state = LightboxState::Open {
                index: (index + n - 1) % n,
            };
        }
    }

    pub fn next(&mut self) {
        let n = self.images.len();
        if n == 0 {
            return;
        }
        if let LightboxState::Open { index } = self.state {
            self.state = LightboxState::Open {
                index: (index + 1) % n,
            };
        }
    }

    pub fn apply(&mut self, command: LightboxCommand) {
        match command {
            LightboxCommand::Close => self.close(),
            LightboxCommand::Prev => self.prev(),
            LightboxCommand::Next => self.next(),
        }
    }

    /// "3/10" style position, when open.
    pub fn position_label(&self) -> Option<String> {
        self.current_index()
            .map(|i| format!("{}/{}", i + 1, self.images.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(n: usize) -> Vec<RemoteEntry> {
        (0..n)
            .map(|i| RemoteEntry {
                id: format!("id{}", i),
                name: format!("img{}.jpg", i),
                mime_type: "image/jpeg".to_string(),
            })
            .collect()
    }

    fn open_at(n: usize, index: usize) -> Lightbox {
        let mut lb = Lightbox::new();
        lb.set_images(images(n));
        assert!(lb.open(index));
        lb
    }

    #[test]
    fn test_next_n_times_is_identity() {
        for n in 1..6 {
            for start in 0..n {
                let mut lb = open_at(n, start);
                for _ in 0..n {
                    lb.next();
                }
                assert_eq!(lb.current_index(), Some(start));
            }
        }
    }

    #[test]
    fn test_prev_then_next_is_identity() {
        let mut lb = open_at(4, 0);
        lb.prev();
        assert_eq!(lb.current_index(), Some(3));
        lb.next();
        assert_eq!(lb.current_index(), Some(0));
    }

    #[test]
    fn test_empty_set_cannot_open() {
        let mut lb = Lightbox::new();
        assert!(!lb.open(0));
        assert!(!lb.is_open());
        lb.next();
        lb.prev();
        assert_eq!(lb.state(), LightboxState::Closed);
    }

    #[test]
    fn test_out_of_range_open_stays_closed() {
        let mut lb = Lightbox::new();
        lb.set_images(images(2));
        assert!(!lb.open(2));
        assert!(lb.current().is_none());
    }

    #[test]
    fn test_navigation_while_closed_is_noop() {
        let mut lb = Lightbox::new();
        lb.set_images(images(3));
        lb.next();
        assert_eq!(lb.state(), LightboxState::Closed);
    }

    #[test]
    fn test_open_close_cycle() {
        let mut lb = open_at(3, 1);
        assert_eq!(lb.current().unwrap().id, "id1");
        assert_eq!(lb.position_label().as_deref(), Some("2/3"));

        lb.apply(LightboxCommand::Next);
        assert_eq!(lb.current().unwrap().id, "id2");

        lb.apply(LightboxCommand::Close);
        assert!(!lb.is_open());
        assert!(lb.position_label().is_none());
        assert_eq!(lb.images().len(), 3);
    }

    #[test]
    fn test_set_images_closes() {
        let mut lb = open_at(3, 2);
        lb.set_images(images(1));
        assert!(!lb.is_open());
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(command_for_key(KeyCode::Esc), Some(LightboxCommand::Close));
        assert_eq!(command_for_key(KeyCode::Left), Some(LightboxCommand::Prev));
        assert_eq!(command_for_key(KeyCode::Right), Some(LightboxCommand::Next));
        assert_eq!(command_for_key(KeyCode::Enter), None);
    }
}
