use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use cybershield::config::{default_data_dir, log_file, storage_file};
use cybershield::settings::SettingsScreen;
use cybershield::ui::{init_terminal, restore_terminal};
use cybershield::{FileStorage, MemorySurface, SettingsController, SettingsRegistry, SettingsStore};

#[derive(Debug, Parser)]
#[command(name = "cybershield", version, about = "CyberShield console settings")]
struct Args {
    /// Directory holding the settings store and log file.
    #[arg(long, env = "CYBERSHIELD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log filter, e.g. `info` or `cybershield=debug`.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Write the current settings to FILE and exit.
    #[arg(long, value_name = "FILE", conflicts_with = "import")]
    export: Option<PathBuf>,

    /// Replace the settings with the contents of FILE and exit.
    #[arg(long, value_name = "FILE")]
    import: Option<PathBuf>,
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Logs go to a file so they never tear the terminal UI.
fn init_logging(data_dir: &Path, level: &str) -> Result<()> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;
    let path = log_file(data_dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_secs()
        .init();
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);
    init_logging(&data_dir, &args.log_level)?;

    let storage = FileStorage::new(storage_file(&data_dir));
    log::info!("using settings store {}", storage.path().display());
    let mut controller =
        SettingsController::new(SettingsStore::new(storage), SettingsRegistry::cybershield());

    if let Some(path) = args.export {
        let artifact = controller.store().export_all()?;
        std::fs::write(&path, artifact.contents)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Exported settings to {}", path.display());
        return Ok(());
    }

    if let Some(path) = args.import {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let mut surface = MemorySurface::for_registry(controller.registry());
        let map = controller
            .import_all(&mut surface, &raw)
            .with_context(|| format!("importing {}", path.display()))?;
        println!("Imported {} settings from {}", map.len(), path.display());
        return Ok(());
    }

    let export_dir = std::env::current_dir().unwrap_or_else(|_| data_dir.clone());
    let mut screen = SettingsScreen::new(controller, export_dir);
    let mut terminal = init_terminal()?;

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        screen.run(&mut terminal)
    }));

    // Always restore terminal
    restore_terminal(&mut terminal).ok();

    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e),
        Err(_) => {
            log::error!("settings screen panicked");
            eprintln!("CyberShield crashed. See {}", log_file(&data_dir).display());
            Ok(())
        }
    }
}
