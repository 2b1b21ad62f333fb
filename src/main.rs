//! Binary entry point: read the config, start logging, open the SQLite-backed
//! library, then either run a one-shot command or drive the Ratatui event loop.
use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use onsong_library::{
    logging, run_app, App, AppConfig, FsTextReader, ImportOutcome, LibraryManager, PathPicker,
    SqliteStore,
};
use tracing::info;

fn print_usage() {
    println!("onsong-library - import, browse, and edit .onsong song files");
    println!();
    println!("Usage: onsong-library [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --import <PATH>    Import one file into the library and exit");
    println!("  --list             Print the names of every song in the library");
    println!("  --delete <NAME>    Remove every song with exactly this name");
    println!("  --config <PATH>    Read configuration from PATH");
    println!("  --help             Show this help message");
    println!();
    println!("Without a command the interactive library opens.");
}

enum Command {
    Interactive,
    Import(PathBuf),
    List,
    Delete(String),
}

struct Args {
    command: Command,
    config: Option<PathBuf>,
}

/// Returns `None` when the user only asked for help.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Args>> {
    let mut command = Command::Interactive;
    let mut config = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--import" => {
                let path = args.next().ok_or_else(|| anyhow!("--import needs a path"))?;
                command = Command::Import(PathBuf::from(path));
            }
            "--list" => command = Command::List,
            "--delete" => {
                let name = args.next().ok_or_else(|| anyhow!("--delete needs a name"))?;
                command = Command::Delete(name);
            }
            "--config" => {
                let path = args.next().ok_or_else(|| anyhow!("--config needs a path"))?;
                config = Some(PathBuf::from(path));
            }
            "--help" | "-h" => return Ok(None),
            other => bail!("unknown argument: {other} (try --help)"),
        }
    }

    Ok(Some(Args { command, config }))
}

fn main() -> Result<()> {
    let Some(args) = parse_args(env::args().skip(1))? else {
        print_usage();
        return Ok(());
    };

    let config_path = match args.config {
        Some(path) => path,
        None => AppConfig::default_path()?,
    };
    let config = AppConfig::load(&config_path)?;
    let _log_guard = logging::init(&config.log_dir()?, &config.log_filter)?;
    info!(config = %config_path.display(), "starting onsong-library");

    let store = SqliteStore::open(&config.storage_path()?)?;
    let mut manager = LibraryManager::load(store)
        .with_edit_debounce(config.edit_debounce())
        .with_type_filter(config.type_filter());

    match args.command {
        Command::Import(path) => {
            let mut picker = PathPicker::new(Some(path));
            match manager.import_file(&mut picker, &FsTextReader) {
                ImportOutcome::Imported(id) => {
                    let song = manager
                        .get(id)
                        .context("imported song missing from library")?;
                    println!("Imported {} ({} lines)", song.name, song.line_count());
                }
                ImportOutcome::Cancelled => println!("Nothing imported."),
                ImportOutcome::Failed(err) => return Err(err.context("import failed")),
            }
        }
        Command::List => {
            if manager.is_empty() {
                println!("The library is empty.");
            }
            for song in manager.songs() {
                println!("{}\t{}", song.name, song.uri);
            }
        }
        Command::Delete(name) => {
            let removed = manager.delete_songs_named(&name);
            println!("Removed {removed} song(s) named {name:?}.");
        }
        Command::Interactive => {
            let mut app = App::new(manager, config.theme, config.browse_dir());
            run_app(&mut app)?;
        }
    }

    Ok(())
}
