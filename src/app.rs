use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::drive::DriveApi;
use crate::export::{default_export_path, export_folder, ExportFormat};
use crate::gallery::{FolderLoader, FolderView, ImageArea, Preloader, ThumbnailCache, ViewOptions};
use crate::lightbox::{self, Lightbox};
use crate::nav::{list_subfolders, CategoryMap, Command, NavEffect, NavItem, NavState};
use crate::tasks::{BackgroundTaskManager, TaskOutput, TaskType};
use crate::ui;
use crate::ui::images::ImageCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Browse,
    Lightbox,
    Help,
}

/// Which pane receives navigation keys in browse mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Nav,
    Content,
}

/// What the main pane shows.
#[derive(Debug)]
pub enum Content {
    Empty,
    Loading { title: String },
    Folder { title: String, view: FolderView },
    Info(String),
}

pub struct App {
    pub config: Config,
    api: Arc<dyn DriveApi>,
    loader: Arc<FolderLoader>,
    pub categories: CategoryMap,
    pub nav: NavState,
    pub nav_selected: usize,
    pub content: Content,
    pub grid_selected: usize,
    /// First visible row of the grid, or first visible page in a book
    pub scroll_offset: usize,
    /// Grid columns at the last render, used for up/down movement
    pub grid_columns: usize,
    pub lightbox: Lightbox,
    pub mode: AppMode,
    pub focus: Focus,
    pub tasks: BackgroundTaskManager,
    pub images: ImageCache,
    pub status_message: Option<String>,
    pub should_quit: bool,
    pub export_dir: PathBuf,
    // Terminal graphics leave artifacts when an overlay closes
    pub clear_on_next_render: bool,
}

impl App {
    pub fn new(config: Config, api: Arc<dyn DriveApi>) -> Self {
        let cache = if config.thumbnails.cache_enabled {
            ThumbnailCache::new(config.thumbnails.path.clone())
        } else {
            ThumbnailCache::disabled()
        };
        let preloader = Preloader::new(Arc::clone(&api), cache);
        let loader = FolderLoader::new(
            Arc::clone(&api),
            preloader,
            &config.drive.thumbnail_base,
            (&config.thumbnails).into(),
        );
        let images = ImageCache::new(config.preview.protocol, Arc::clone(&api));
        let export_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        Self {
            config,
            api,
            loader: Arc::new(loader),
            categories: CategoryMap::default(),
            nav: NavState::new(),
            nav_selected: 0,
            content: Content::Empty,
            grid_selected: 0,
            scroll_offset: 0,
            grid_columns: 4,
            lightbox: Lightbox::new(),
            mode: AppMode::Browse,
            focus: Focus::Nav,
            tasks: BackgroundTaskManager::new(),
            images,
            status_message: None,
            should_quit: false,
            export_dir,
            clear_on_next_render: false,
        }
    }

    /// Build the category map and show the portfolio.
    pub fn start(&mut self) {
        let api = Arc::clone(&self.api);
        let root = self.config.drive.root_folder_id.clone();
        self.spawn(TaskType::Categories, move || {
            TaskOutput::Categories(CategoryMap::build(api.as_ref(), &root))
        });

        self.dispatch(Command::Portfolio);
    }

    fn spawn<F>(&mut self, task_type: TaskType, work: F)
    where
        F: FnOnce() -> TaskOutput + Send + 'static,
    {
        let handle = self.tasks.begin(task_type);
        std::thread::spawn(move || handle.finish(work()));
    }

    pub fn nav_items(&self) -> Vec<NavItem> {
        self.nav.items(&self.config.categories)
    }

    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::Portfolio => {
                self.nav.collapse_all();
                let root = self.config.drive.root_folder_id.clone();
                self.load_folder(root, "Portfolio".to_string(), ViewOptions::portfolio());
            }
            Command::ToggleCategory(name) => self.toggle_category(&name),
            Command::OpenFolder {
                folder_id,
                title,
                options,
            } => {
                self.load_folder(folder_id, title, options);
                self.focus = Focus::Content;
            }
            Command::Info => {
                self.nav.collapse_all();
                self.clear_content();
                self.content = Content::Info(self.config.info_text.clone());
            }
            Command::OpenImage(index) => self.open_image(index),
            Command::Lightbox(command) => {
                self.lightbox.apply(command);
                if self.lightbox.is_open() {
                    self.request_lightbox_image();
                } else {
                    self.mode = AppMode::Browse;
                    self.clear_on_next_render = true;
                }
            }
            Command::Export(format) => self.export_current(format),
            Command::Help => self.mode = AppMode::Help,
            Command::Quit => self.should_quit = true,
        }
        self.clamp_nav_selection();
    }

    fn toggle_category(&mut self, name: &str) {
        match self.nav.toggle(name, &self.categories) {
            NavEffect::None => {
                if self.categories.is_empty() {
                    self.status_message = Some("Categories not loaded".to_string());
                }
            }
            NavEffect::ClearContent => self.clear_content(),
            NavEffect::ListSubfolders { category, folder_id } => {
                let api = Arc::clone(&self.api);
                self.spawn(TaskType::Subfolders, move || TaskOutput::Subfolders {
                    folders: list_subfolders(api.as_ref(), &folder_id),
                    category,
                });
            }
        }
    }

    /// Drop the displayed folder, including any load still in flight.
    fn clear_content(&mut self) {
        self.tasks.invalidate(TaskType::Folder);
        self.lightbox.set_images(Vec::new());
        self.images.clear();
        self.content = Content::Empty;
        self.grid_selected = 0;
        self.scroll_offset = 0;
        if self.mode == AppMode::Lightbox {
            self.mode = AppMode::Browse;
            self.clear_on_next_render = true;
        }
    }

    fn load_folder(&mut self, folder_id: String, title: String, options: ViewOptions) {
        self.clear_content();
        self.content = Content::Loading {
            title: title.clone(),
        };

        let loader = Arc::clone(&self.loader);
        self.spawn(TaskType::Folder, move || {
            let view = loader.load(&folder_id, options);
            TaskOutput::Folder {
                title,
                view: Box::new(view),
            }
        });
    }

    fn open_image(&mut self, index: usize) {
        let is_grid = matches!(
            self.content,
            Content::Folder {
                view: FolderView {
                    area: ImageArea::Tiles(_),
                    ..
                },
                ..
            }
        );
        if !is_grid {
            return;
        }
        if self.lightbox.open(index) {
            self.mode = AppMode::Lightbox;
            self.request_lightbox_image();
        }
    }

    /// Full-size URL of the image the lightbox shows.
    pub fn lightbox_url(&self) -> Option<String> {
        self.lightbox.current().map(|e| self.loader.lightbox_url(e))
    }

    fn request_lightbox_image(&mut self) {
        if let Some(url) = self.lightbox_url() {
            self.images.request(&url);
        }
    }

    fn export_current(&mut self, format: ExportFormat) {
        let Content::Folder { ref title, ref view } = self.content else {
            self.status_message = Some("Nothing to export".to_string());
            return;
        };

        let path = default_export_path(&self.export_dir, title, format);
        self.status_message = Some(match export_folder(title, view, &path, format) {
            Ok(count) => {
                info!(?path, count, "Exported folder");
                format!("Exported {} images as {} to {}", count, format.name(), path.display())
            }
            Err(e) => {
                warn!(?path, "Export failed: {}", e);
                format!("Export failed: {}", e)
            }
        });
    }

    /// Apply finished background work. Called once per frame.
    pub fn poll(&mut self) {
        self.images.poll_async_loads();

        for update in self.tasks.poll_updates() {
            match update.output {
                TaskOutput::Categories(map) => {
                    if map.is_empty() {
                        self.status_message = Some("No categories found".to_string());
                    }
                    self.categories = map;
                }
                TaskOutput::Subfolders { category, folders } => {
                    self.nav.set_subfolders(&category, folders);
                    self.clamp_nav_selection();
                }
                TaskOutput::Folder { title, mut view } => {
                    self.images.clear();
                    for (url, img) in view.take_images() {
                        self.images.insert(url, img);
                    }
                    self.lightbox.set_images(view.images());
                    self.grid_selected = 0;
                    self.scroll_offset = 0;
                    self.content = Content::Folder { title, view: *view };
                }
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.content, Content::Loading { .. })
    }

    fn clamp_nav_selection(&mut self) {
        let count = self.nav_items().len();
        self.nav_selected = self.nav_selected.min(count.saturating_sub(1));
    }

    fn content_len(&self) -> usize {
        match self.content {
            Content::Folder { ref view, .. } => view.area.len(),
            _ => 0,
        }
    }

    fn is_book(&self) -> bool {
        matches!(
            self.content,
            Content::Folder { ref view, .. } if view.options.is_book
        )
    }

    pub async fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        while !self.should_quit {
            self.poll();

            if self.clear_on_next_render {
                terminal.clear()?;
                self.clear_on_next_render = false;
            }

            terminal.draw(|frame| ui::render(frame, self))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }

        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // A key press dismisses any status message
        self.status_message = None;

        match self.mode {
            AppMode::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                    self.mode = AppMode::Browse;
                }
            }
            AppMode::Lightbox => {
                if let Some(command) = lightbox::command_for_key(key.code) {
                    self.dispatch(Command::Lightbox(command));
                }
            }
            AppMode::Browse => self.handle_browse_key(key),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.dispatch(Command::Quit)
            }
            KeyCode::Char('q') => self.dispatch(Command::Quit),
            KeyCode::Char('?') => self.dispatch(Command::Help),
            KeyCode::Char('p') => self.dispatch(Command::Portfolio),
            KeyCode::Char('i') => self.dispatch(Command::Info),
            KeyCode::Char('e') => self.dispatch(Command::Export(ExportFormat::Html)),
            KeyCode::Char('E') => self.dispatch(Command::Export(ExportFormat::Json)),
            KeyCode::Char('C') => self.dispatch(Command::Export(ExportFormat::Csv)),
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Nav => Focus::Content,
                    Focus::Content => Focus::Nav,
                };
            }
            _ => match self.focus {
                Focus::Nav => self.handle_nav_key(key),
                Focus::Content => self.handle_content_key(key),
            },
        }
    }

    fn handle_nav_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('k') | KeyCode::Up => {
                self.nav_selected = self.nav_selected.saturating_sub(1);
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.nav_selected += 1;
                self.clamp_nav_selection();
            }
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right | KeyCode::Char(' ') => {
                if let Some(item) = self.nav_items().into_iter().nth(self.nav_selected) {
                    self.dispatch(item.command);
                }
            }
            _ => {}
        }
    }

    fn handle_content_key(&mut self, key: KeyEvent) {
        let len = self.content_len();

        if key.code == KeyCode::Esc {
            self.focus = Focus::Nav;
            return;
        }

        if self.is_book() {
            // Pages scroll one at a time
            match key.code {
                KeyCode::Char('k') | KeyCode::Up | KeyCode::PageUp => {
                    self.scroll_offset = self.scroll_offset.saturating_sub(1);
                }
                KeyCode::Char('j') | KeyCode::Down | KeyCode::PageDown => {
                    if self.scroll_offset + 1 < len {
                        self.scroll_offset += 1;
                    }
                }
                KeyCode::Char('g') => self.scroll_offset = 0,
                KeyCode::Char('G') => self.scroll_offset = len.saturating_sub(1),
                _ => {}
            }
            return;
        }

        let columns = self.grid_columns.max(1);
        match key.code {
            KeyCode::Char('h') | KeyCode::Left => {
                self.grid_selected = self.grid_selected.saturating_sub(1);
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if self.grid_selected + 1 < len {
                    self.grid_selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.grid_selected >= columns {
                    self.grid_selected -= columns;
                }
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.grid_selected + columns < len {
                    self.grid_selected += columns;
                }
            }
            KeyCode::Char('g') => self.grid_selected = 0,
            KeyCode::Char('G') => self.grid_selected = len.saturating_sub(1),
            KeyCode::Enter => self.dispatch(Command::OpenImage(self.grid_selected)),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageProtocol;
    use crate::drive::fake::{file, folder, image, FakeDrive};
    use crate::lightbox::LightboxCommand;
    use std::time::Instant;

    fn config() -> Config {
        let mut config = Config::default();
        config.drive.root_folder_id = "root".to_string();
        config.preview.protocol = ImageProtocol::None;
        config.thumbnails.cache_enabled = false;
        config.info_text = "About me".to_string();
        config
    }

    fn drive() -> FakeDrive {
        FakeDrive::new()
            .with_folder(
                "root",
                vec![
                    folder("projects", "Projects"),
                    folder("books", "Books"),
                    image("r1", "hero.jpg"),
                ],
            )
            .with_folder("projects", vec![folder("alpha", "Alpha"), folder("beta", "Beta")])
            .with_folder("books", vec![folder("zine", "Zine")])
            .with_folder(
                "alpha",
                vec![
                    image("a1", "one.jpg"),
                    image("a2", "two.jpg"),
                    image("a3", "three.jpg"),
                    file("readme", "readme.txt", "text/plain"),
                ],
            )
            .with_folder("beta", vec![image("b1", "only.jpg")])
            .with_folder("zine", vec![image("z1", "cover.jpg"), image("z2", "p1.jpg")])
            .with_text("readme", "Alpha project")
    }

    fn app() -> App {
        App::new(config(), Arc::new(drive()))
    }

    fn wait_until(app: &mut App, mut done: impl FnMut(&App) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            app.poll();
            if done(app) {
                return;
            }
            assert!(Instant::now() < deadline, "timed out waiting for background work");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn folder_title(app: &App) -> Option<&str> {
        match app.content {
            Content::Folder { ref title, .. } => Some(title.as_str()),
            _ => None,
        }
    }

    fn open_alpha(app: &mut App) {
        app.dispatch(Command::OpenFolder {
            folder_id: "alpha".to_string(),
            title: "Alpha".to_string(),
            options: ViewOptions::grid(),
        });
        wait_until(app, |a| folder_title(a) == Some("Alpha"));
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_start_builds_categories_and_shows_portfolio() {
        let mut app = app();
        app.start();
        wait_until(&mut app, |a| !a.categories.is_empty() && folder_title(a).is_some());

        assert_eq!(folder_title(&app), Some("Portfolio"));
        assert_eq!(app.categories.get("Projects"), Some("projects"));
        assert_eq!(app.lightbox.images().len(), 1);
    }

    #[test]
    fn test_category_toggle_lists_and_collapses() {
        let mut app = app();
        app.start();
        wait_until(&mut app, |a| !a.categories.is_empty());

        app.dispatch(Command::ToggleCategory("Projects".to_string()));
        wait_until(&mut app, |a| a.nav_items().len() == 6);
        let labels: Vec<String> = app.nav_items().into_iter().map(|i| i.label).collect();
        assert_eq!(labels, vec!["Portfolio", "Projects", "Alpha", "Beta", "Books", "Info"]);

        open_alpha(&mut app);
        app.dispatch(Command::ToggleCategory("Projects".to_string()));
        assert!(matches!(app.content, Content::Empty));
        assert_eq!(app.nav_items().len(), 4);
        assert!(app.lightbox.images().is_empty());
    }

    #[test]
    fn test_expanding_books_collapses_projects() {
        let mut app = app();
        app.start();
        wait_until(&mut app, |a| !a.categories.is_empty());

        app.dispatch(Command::ToggleCategory("Projects".to_string()));
        wait_until(&mut app, |a| a.nav.is_expanded("Projects") && a.nav_items().len() == 6);
        app.dispatch(Command::ToggleCategory("Books".to_string()));
        wait_until(&mut app, |a| a.nav_items().len() == 5);

        assert!(!app.nav.is_expanded("Projects"));
        let zine = app.nav_items().into_iter().find(|i| i.label == "Zine").unwrap();
        assert!(matches!(zine.command, Command::OpenFolder { options, .. } if options.is_book));
    }

    #[test]
    fn test_category_before_map_is_noop() {
        let mut app = app();
        app.dispatch(Command::ToggleCategory("Projects".to_string()));
        assert!(app.nav.expanded_category().is_none());
        assert_eq!(app.status_message.as_deref(), Some("Categories not loaded"));
    }

    #[test]
    fn test_folder_load_with_description() {
        let mut app = app();
        open_alpha(&mut app);

        match app.content {
            Content::Folder { ref view, .. } => {
                assert_eq!(view.description.as_deref(), Some("Alpha project"));
                assert_eq!(view.area.len(), 3);
            }
            _ => panic!("folder not shown"),
        }
        assert_eq!(app.focus, Focus::Content);
    }

    #[test]
    fn test_lightbox_keyboard_flow() {
        let mut app = app();
        open_alpha(&mut app);

        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.mode, AppMode::Lightbox);
        assert_eq!(app.lightbox.current_index(), Some(1));
        assert_eq!(app.lightbox_url().as_deref(), Some("https://drive.google.com/thumbnail?id=a2&sz=w1200"));

        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.lightbox.current_index(), Some(0));

        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.lightbox.current_index(), Some(2));

        // Browse keys are not active while the lightbox is open
        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert_eq!(app.mode, AppMode::Browse);

        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.mode, AppMode::Browse);
        assert!(!app.lightbox.is_open());
    }

    #[test]
    fn test_book_pages_do_not_open_lightbox() {
        let mut app = app();
        app.dispatch(Command::OpenFolder {
            folder_id: "zine".to_string(),
            title: "Zine".to_string(),
            options: ViewOptions::book(),
        });
        wait_until(&mut app, |a| folder_title(a) == Some("Zine"));

        match app.content {
            Content::Folder { ref view, .. } => {
                assert_eq!(view.cover.as_ref().unwrap().entry.name, "cover.jpg");
                assert_eq!(view.area.len(), 1);
            }
            _ => panic!("folder not shown"),
        }

        app.dispatch(Command::OpenImage(0));
        assert_eq!(app.mode, AppMode::Browse);
    }

    #[test]
    fn test_newer_load_wins() {
        let mut app = app();
        app.dispatch(Command::OpenFolder {
            folder_id: "alpha".to_string(),
            title: "Alpha".to_string(),
            options: ViewOptions::grid(),
        });
        app.dispatch(Command::OpenFolder {
            folder_id: "beta".to_string(),
            title: "Beta".to_string(),
            options: ViewOptions::grid(),
        });

        wait_until(&mut app, |a| folder_title(a).is_some());
        assert_eq!(folder_title(&app), Some("Beta"));

        // Give the superseded load time to finish; it must not replace Beta.
        std::thread::sleep(Duration::from_millis(100));
        app.poll();
        assert_eq!(folder_title(&app), Some("Beta"));
        assert_eq!(app.lightbox.images().len(), 1);
    }

    #[test]
    fn test_info_discards_pending_load() {
        let mut app = app();
        app.dispatch(Command::OpenFolder {
            folder_id: "alpha".to_string(),
            title: "Alpha".to_string(),
            options: ViewOptions::grid(),
        });
        app.dispatch(Command::Info);

        std::thread::sleep(Duration::from_millis(100));
        app.poll();
        assert!(matches!(app.content, Content::Info(ref text) if text == "About me"));
        assert!(!app.tasks.is_running(TaskType::Folder));
    }

    #[test]
    fn test_missing_folder_renders_empty() {
        let mut app = app();
        app.dispatch(Command::OpenFolder {
            folder_id: "gone".to_string(),
            title: "Gone".to_string(),
            options: ViewOptions::grid(),
        });
        wait_until(&mut app, |a| folder_title(a).is_some());

        match app.content {
            Content::Folder { ref view, .. } => assert!(view.is_empty()),
            _ => panic!("folder not shown"),
        }
        app.dispatch(Command::OpenImage(0));
        assert_eq!(app.mode, AppMode::Browse);
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app();
        app.export_dir = dir.path().to_path_buf();

        app.dispatch(Command::Export(ExportFormat::Html));
        assert_eq!(app.status_message.as_deref(), Some("Nothing to export"));

        open_alpha(&mut app);
        app.dispatch(Command::Export(ExportFormat::Html));
        assert!(app.status_message.as_deref().unwrap().starts_with("Exported 3 images"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_nav_keys_activate_entries() {
        let mut app = app();
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.nav_selected, 3);
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.nav_selected, 3);

        app.handle_key(key(KeyCode::Enter));
        assert!(matches!(app.content, Content::Info(_)));

        app.handle_key(key(KeyCode::Char('?')));
        assert_eq!(app.mode, AppMode::Help);
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.mode, AppMode::Browse);

        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_lightbox_close_command() {
        let mut app = app();
        open_alpha(&mut app);
        app.dispatch(Command::OpenImage(2));
        assert_eq!(app.mode, AppMode::Lightbox);
        app.dispatch(Command::Lightbox(LightboxCommand::Close));
        assert_eq!(app.mode, AppMode::Browse);
        assert!(app.clear_on_next_render);
    }
}
