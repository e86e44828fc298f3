//! Deciding what a folder shows: shortcut resolution, file classification,
//! cover extraction and description selection. No I/O happens here.

use tracing::debug;

use super::ViewOptions;
use crate::drive::{RemoteEntry, RemoteFile};

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];
const COVER_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Name prefixes tried in order when picking the description file.
const DESCRIPTION_PREFERENCE: [&str; 3] = ["readme", "info", "description"];

/// What a folder load should fetch and display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderPlan {
    pub cover: Option<RemoteEntry>,
    /// Remaining images in listing order
    pub images: Vec<RemoteEntry>,
    pub description_source: Option<RemoteEntry>,
}

/// Resolve a listed file to the content it stands for.
///
/// Shortcuts become their target id and mime type, keeping the shortcut's own
/// name (or the target id when unnamed). A shortcut with no target resolves to
/// nothing.
pub fn resolve_shortcut(file: RemoteFile) -> Option<RemoteEntry> {
    if !file.is_shortcut() {
        return Some(RemoteEntry {
            id: file.id,
            name: file.name,
            mime_type: file.mime_type,
        });
    }

    let details = file.shortcut_details.unwrap_or_default();
    let Some(target_id) = details.target_id.filter(|t| !t.is_empty()) else {
        debug!(id = %file.id, name = %file.name, "Dropping shortcut without a target");
        return None;
    };

    let name = if file.name.is_empty() {
        target_id.clone()
    } else {
        file.name
    };

    Some(RemoteEntry {
        id: target_id,
        name,
        mime_type: details.target_mime_type.unwrap_or_default(),
    })
}

fn extension(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
}

pub fn is_text_file(entry: &RemoteEntry) -> bool {
    entry.name.to_lowercase().ends_with(".txt") || entry.mime_type.eq_ignore_ascii_case("text/plain")
}

pub fn is_image_file(entry: &RemoteEntry) -> bool {
    if entry.mime_type.to_lowercase().starts_with("image/") {
        return true;
    }
    extension(&entry.name)
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn is_cover_name(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((stem, ext)) => {
            stem.eq_ignore_ascii_case("cover") && COVER_EXTENSIONS.contains(&ext.to_lowercase().as_str())
        }
        None => false,
    }
}

/// Take the cover out of a book's images.
///
/// A file named `cover.<ext>` wins; otherwise a lone image is the cover.
pub fn extract_cover(images: &mut Vec<RemoteEntry>) -> Option<RemoteEntry> {
    if let Some(idx) = images.iter().position(|e| is_cover_name(&e.name)) {
        return Some(images.remove(idx));
    }
    if images.len() == 1 {
        return images.pop();
    }
    None
}

/// Pick the description file by name preference, falling back to the first.
pub fn choose_description(text_files: &[RemoteEntry]) -> Option<&RemoteEntry> {
    DESCRIPTION_PREFERENCE
        .iter()
        .find_map(|pref| {
            text_files
                .iter()
                .find(|f| f.name.to_lowercase().starts_with(pref))
        })
        .or_else(|| text_files.first())
}

/// Work out cover, pages/tiles and description source for a folder listing.
pub fn plan_folder(files: Vec<RemoteFile>, options: ViewOptions) -> FolderPlan {
    let resolved: Vec<RemoteEntry> = files.into_iter().filter_map(resolve_shortcut).collect();

    let text_files: Vec<RemoteEntry> = resolved.iter().filter(|e| is_text_file(e)).cloned().collect();
    let mut images: Vec<RemoteEntry> = resolved.into_iter().filter(is_image_file).collect();

    let cover = if options.is_book {
        extract_cover(&mut images)
    } else {
        None
    };

    let description_source = if options.show_text {
        choose_description(&text_files).cloned()
    } else {
        None
    };

    FolderPlan {
        cover,
        images,
        description_source,
    }
}
