use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use drivefolio::app::App;
use drivefolio::config::{Config, API_KEY_ENV, CONFIG_PATH_ENV};
use drivefolio::drive::{DriveApi, DriveClient};
use drivefolio::logging;

fn parse_args() -> Option<PathBuf> {
    let args: Vec<String> = std::env::args().collect();
    let mut config_path = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("drivefolio {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    config_path
}

fn print_help() {
    println!(
        r#"drivefolio - terminal portfolio gallery for Google Drive

USAGE:
    drivefolio [OPTIONS]

OPTIONS:
    --config, -c PATH   Path to config file
    --version, -V       Show version
    --help, -h          Show this help message

ENVIRONMENT:
    {}   Path to config file (overrides default location)
    {}  Drive API key (overrides the config file)
    {}      Log level (trace, debug, info, warn, error)

Config file location: $XDG_CONFIG_HOME/drivefolio/config.toml

See also: drivefolio-config --help"#,
        CONFIG_PATH_ENV,
        API_KEY_ENV,
        logging::LOG_ENV
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = parse_args();

    // Initialize logging (uses journald on Linux, file fallback otherwise)
    let _ = logging::init(Some(Config::config_dir().join("logs")));

    let config = match config_path {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };

    let client = DriveClient::from_config(&config.drive);
    if !client.has_api_key() {
        warn!(
            "No Drive API key configured; set {} or run drivefolio-config. Folder listings will fail.",
            API_KEY_ENV
        );
    }
    info!(root = %config.drive.root_folder_id, "Starting drivefolio");
    let api: Arc<dyn DriveApi> = Arc::new(client);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(config, api);
    app.start();
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
