mod dataset;
mod error;
mod paths;
mod shell;
mod view;

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use revboard_table::TableSettings;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::error::CliError;
use crate::shell::Shell;

/// Interactive revenue report table.
#[derive(Parser, Debug)]
#[command(name = "revboard")]
#[command(about = "Browse a revenue report from the terminal")]
struct Args {
    /// Serve rows one page at a time, as a paginated backend would.
    #[arg(long)]
    server: bool,

    /// Table settings JSON file (defaults to the config directory).
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Log file (defaults to the cache directory).
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
}

fn init_logger(path: Option<PathBuf>) -> Result<(), CliError> {
    let path = path
        .or_else(paths::log_file)
        .unwrap_or_else(|| PathBuf::from("revboard.log"));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let log_file = File::create(&path)?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)?;
    Ok(())
}

fn read_settings(path: &Path) -> Result<TableSettings, CliError> {
    let json = fs::read_to_string(path).map_err(|source| CliError::SettingsFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(TableSettings::from_json_str(&json)?)
}

/// Settings from an explicit file, else the default config file when present.
fn load_settings(explicit: Option<&Path>) -> Result<TableSettings, CliError> {
    if let Some(path) = explicit {
        return read_settings(path);
    }
    match paths::settings_file() {
        Some(path) if path.is_file() => {
            log::info!("Loading settings from {}", path.display());
            read_settings(&path)
        }
        _ => Ok(TableSettings::default()),
    }
}

fn run() -> Result<(), CliError> {
    let args = Args::parse();
    init_logger(args.log)?;

    let settings = load_settings(args.settings.as_deref())?;
    log::info!("Starting revboard (server pagination: {})", args.server);

    let mut shell = Shell::new(settings, args.server)?;
    println!("{}\n", shell::HELP);
    let stdin = io::stdin();
    shell.run(stdin.lock(), io::stdout())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_flags() {
        let args = Args::try_parse_from(["revboard", "--server", "--settings", "table.json"]).unwrap();
        assert!(args.server);
        assert_eq!(args.settings, Some(PathBuf::from("table.json")));
        assert_eq!(args.log, None);
    }

    #[test]
    fn test_args_require_a_settings_path() {
        assert!(Args::try_parse_from(["revboard", "--settings"]).is_err());
        assert!(Args::try_parse_from(["revboard", "--verbose"]).is_err());
    }
}
