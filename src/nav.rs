//! Category navigation: the name -> folder map, the expand/collapse state of
//! the sidebar and the commands its entries dispatch.

use std::collections::HashMap;

use tracing::{debug, error, info};

use crate::config::CategoryConfig;
use crate::drive::{ChildFilter, DriveApi, FolderLink};
use crate::export::ExportFormat;
use crate::gallery::ViewOptions;
use crate::lightbox::LightboxCommand;

/// Category display name -> folder id, built from the root folder's children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMap {
    folders: HashMap<String, String>,
}

impl CategoryMap {
    /// List the root's subfolders. A failed listing yields an empty map.
    pub fn build(api: &dyn DriveApi, root_folder_id: &str) -> Self {
        let map = Self::from_folders(list_subfolders(api, root_folder_id));
        info!(count = map.len(), "Category map built");
        map
    }

    pub fn from_folders(folders: Vec<FolderLink>) -> Self {
        Self {
            folders: folders.into_iter().map(|f| (f.name, f.id)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.folders.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

/// Immediate subfolders of a folder, in listing order. Errors are logged and
/// give an empty list.
pub fn list_subfolders(api: &dyn DriveApi, parent_id: &str) -> Vec<FolderLink> {
    match api.list_children(parent_id, ChildFilter::FoldersOnly) {
        Ok(files) => {
            debug!(parent_id, count = files.len(), "Subfolders listed");
            files.into_iter().map(FolderLink::from).collect()
        }
        Err(e) => {
            error!(parent_id, "Error listing subfolders: {}", e);
            Vec::new()
        }
    }
}

/// Everything the user can ask the gallery to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the root folder
    Portfolio,
    /// Expand or collapse a category's subfolder list
    ToggleCategory(String),
    OpenFolder {
        folder_id: String,
        title: String,
        options: ViewOptions,
    },
    Info,
    /// Open the lightbox at a tile's index
    OpenImage(usize),
    Lightbox(LightboxCommand),
    Export(ExportFormat),
    Help,
    Quit,
}

/// What the app must do after a toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEffect {
    None,
    /// A shown category was collapsed; drop the displayed folder
    ClearContent,
    ListSubfolders { category: String, folder_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Expanded {
    category: String,
    folders: Vec<FolderLink>,
}

/// One line of the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: String,
    pub depth: u16,
    pub expanded: bool,
    pub command: Command,
}

/// Which category, if any, has its subfolders showing. At most one does.
#[derive(Debug, Clone, Default)]
pub struct NavState {
    expanded: Option<Expanded>,
}

impl NavState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, category: &str) -> bool {
        self.expanded
            .as_ref()
            .is_some_and(|e| e.category == category)
    }

    pub fn expanded_category(&self) -> Option<&str> {
        self.expanded.as_ref().map(|e| e.category.as_str())
    }

    pub fn collapse_all(&mut self) {
        self.expanded = None;
    }

    /// Expand `category` if it isn't, collapse it if it is. Expanding one
    /// category collapses any other.
    pub fn toggle(&mut self, category: &str, categories: &CategoryMap) -> NavEffect {
        if self.is_expanded(category) {
            debug!(category, "Collapsing category");
            self.expanded = None;
            return NavEffect::ClearContent;
        }

        self.expanded = None;

        let Some(folder_id) = categories.get(category) else {
            debug!(category, "No folder for category");
            return NavEffect::None;
        };

        self.expanded = Some(Expanded {
            category: category.to_string(),
            folders: Vec::new(),
        });
        NavEffect::ListSubfolders {
            category: category.to_string(),
            folder_id: folder_id.to_string(),
        }
    }

    /// Fill in a category's subfolders. Ignored unless that category is still
    /// the expanded one; an empty list collapses it again.
    pub fn set_subfolders(&mut self, category: &str, folders: Vec<FolderLink>) -> bool {
        if !self.is_expanded(category) {
            return false;
        }
        if folders.is_empty() {
            self.expanded = None;
        } else if let Some(ref mut expanded) = self.expanded {
            expanded.folders = folders;
        }
        true
    }

    /// Sidebar entries: Portfolio, each category (with its subfolders when
    /// expanded), Info.
    pub fn items(&self, categories: &[CategoryConfig]) -> Vec<NavItem> {
        let mut items = vec![NavItem {
            label: "Portfolio".to_string(),
            depth: 0,
            expanded: false,
            command: Command::Portfolio,
        }];

        for category in categories {
            let expanded = self.expanded.as_ref().filter(|e| e.category == category.name);
            items.push(NavItem {
                label: category.name.clone(),
                depth: 0,
                expanded: expanded.is_some(),
                command: Command::ToggleCategory(category.name.clone()),
            });

            let options = ViewOptions {
                is_book: category.book,
                show_text: true,
            };
            for folder in expanded.map(|e| e.folders.as_slice()).unwrap_or_default() {
                items.push(NavItem {
                    label: folder.name.clone(),
                    depth: 1,
                    expanded: false,
                    command: Command::OpenFolder {
                        folder_id: folder.id.clone(),
                        title: folder.name.clone(),
                        options,
                    },
                });
            }
        }

        items.push(NavItem {
            label: "Info".to_string(),
            depth: 0,
            expanded: false,
            command: Command::Info,
        });

        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::fake::{folder, image, FakeDrive};

    fn categories() -> Vec<CategoryConfig> {
        vec![
            CategoryConfig {
                name: "Projects".to_string(),
                book: false,
            },
            CategoryConfig {
                name: "Books".to_string(),
                book: true,
            },
        ]
    }

    fn map() -> CategoryMap {
        CategoryMap::from_folders(vec![
            FolderLink {
                id: "p".to_string(),
                name: "Projects".to_string(),
            },
            FolderLink {
                id: "b".to_string(),
                name: "Books".to_string(),
            },
        ])
    }

    fn link(id: &str, name: &str) -> FolderLink {
        FolderLink {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_build_keeps_only_folders() {
        let api = FakeDrive::new().with_folder(
            "root",
            vec![folder("p", "Projects"), image("i", "stray.jpg"), folder("b", "Books")],
        );
        let map = CategoryMap::build(&api, "root");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("Projects"), Some("p"));
        assert_eq!(map.get("Books"), Some("b"));
        assert_eq!(map.get("stray.jpg"), None);
    }

    #[test]
    fn test_build_failure_is_empty() {
        let map = CategoryMap::build(&FakeDrive::new(), "root");
        assert!(map.is_empty());
    }

    #[test]
    fn test_toggle_twice_collapses() {
        let mut nav = NavState::new();
        assert_eq!(
            nav.toggle("Projects", &map()),
            NavEffect::ListSubfolders {
                category: "Projects".to_string(),
                folder_id: "p".to_string()
            }
        );
        assert!(nav.set_subfolders("Projects", vec![link("a", "Alpha")]));
        assert!(nav.is_expanded("Projects"));

        assert_eq!(nav.toggle("Projects", &map()), NavEffect::ClearContent);
        assert!(!nav.is_expanded("Projects"));
    }

    #[test]
    fn test_expanding_one_collapses_the_other() {
        let mut nav = NavState::new();
        nav.toggle("Projects", &map());
        nav.set_subfolders("Projects", vec![link("a", "Alpha")]);

        let effect = nav.toggle("Books", &map());
        assert!(matches!(effect, NavEffect::ListSubfolders { ref category, .. } if category == "Books"));
        assert!(!nav.is_expanded("Projects"));
        assert_eq!(nav.expanded_category(), Some("Books"));
    }

    #[test]
    fn test_unknown_category_is_noop() {
        let mut nav = NavState::new();
        assert_eq!(nav.toggle("Projects", &CategoryMap::default()), NavEffect::None);
        assert!(nav.expanded_category().is_none());
    }

    #[test]
    fn test_late_subfolders_for_collapsed_category_are_ignored() {
        let mut nav = NavState::new();
        nav.toggle("Projects", &map());
        nav.toggle("Books", &map());
        assert!(!nav.set_subfolders("Projects", vec![link("a", "Alpha")]));
        assert!(nav.is_expanded("Books"));
    }

    #[test]
    fn test_empty_subfolders_collapse() {
        let mut nav = NavState::new();
        nav.toggle("Books", &map());
        assert!(nav.set_subfolders("Books", Vec::new()));
        assert!(nav.expanded_category().is_none());
    }

    #[test]
    fn test_items_include_expanded_subfolders_with_options() {
        let mut nav = NavState::new();
        nav.toggle("Books", &map());
        nav.set_subfolders("Books", vec![link("b1", "First"), link("b2", "Second")]);

        let items = nav.items(&categories());
        let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Portfolio", "Projects", "Books", "First", "Second", "Info"]);

        assert!(items[2].expanded);
        assert_eq!(items[3].depth, 1);
        assert_eq!(
            items[3].command,
            Command::OpenFolder {
                folder_id: "b1".to_string(),
                title: "First".to_string(),
                options: ViewOptions::book(),
            }
        );
    }

    #[test]
    fn test_project_folders_open_as_grid() {
        let mut nav = NavState::new();
        nav.toggle("Projects", &map());
        nav.set_subfolders("Projects", vec![link("a", "Alpha")]);

        let items = nav.items(&categories());
        assert!(matches!(
            items[2].command,
            Command::OpenFolder { options, .. } if options == ViewOptions::grid()
        ));
    }
}
