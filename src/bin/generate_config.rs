//! Writes the Drive API key from the environment into the drivefolio config.
//!
//! ```bash
//! API_KEY=... drivefolio-config              # default config location
//! API_KEY=... drivefolio-config -o ./cfg.toml
//! ```

use anyhow::Result;
use std::path::PathBuf;

use drivefolio::config::Config;

/// Environment variable the key is read from.
const SOURCE_ENV: &str = "API_KEY";

fn parse_args() -> Option<PathBuf> {
    let args: Vec<String> = std::env::args().collect();
    let mut output = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--output" | "-o" => {
                if i + 1 < args.len() {
                    output = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --output requires a path argument");
                    std::process::exit(1);
                }
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    output
}

fn print_help() {
    println!(
        r#"drivefolio-config - store a Drive API key in the drivefolio config

USAGE:
    {}=<key> drivefolio-config [OPTIONS]

OPTIONS:
    --output, -o PATH   Config file to write (default: drivefolio's config path)
    --help, -h          Show this help message

Existing settings in the file are kept; only the API key is replaced."#,
        SOURCE_ENV
    );
}

fn main() -> Result<()> {
    let output = parse_args();

    let Some(api_key) = std::env::var(SOURCE_ENV)
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
    else {
        eprintln!("{} not set in environment. Aborting.", SOURCE_ENV);
        std::process::exit(1);
    };

    let path = output.unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&path)?;
    config.drive.api_key = Some(api_key);
    config.save_to(&path)?;

    println!("Wrote {}", path.display());
    Ok(())
}
