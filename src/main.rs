//! Blockpad - a terminal rich-text scratchpad with an archive of saved
//! documents.
//!
//! # Usage
//!
//! ```bash
//! blockpad
//! blockpad --data-dir ./notes --key drafts
//! blockpad --dump
//! ```

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;

use blockpad::app::App;
use blockpad::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use blockpad::document::to_marked_text;
use blockpad::store::{DocumentStore, FileStorage, MemoryStorage, Storage};

/// A terminal rich-text scratchpad with markdown-style auto-format triggers
#[derive(Parser, Debug)]
#[command(name = "blockpad", version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Directory holding the saved-document archive
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Storage key the archive is kept under
    #[arg(long, value_name = "KEY")]
    key: Option<String>,

    /// Storage quota in bytes
    #[arg(long, value_name = "BYTES")]
    quota: Option<u64>,

    /// Keep the archive in memory only; nothing is written to disk
    #[arg(long)]
    ephemeral: bool,

    /// Disable the `#`, `*`, `**` and `***` auto-format triggers
    #[arg(long)]
    no_triggers: bool,

    /// Log file used while the editor runs (default: blockpad.log in the data dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the saved archive as plain text and exit
    #[arg(long)]
    dump: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

/// Where log output goes. The terminal UI owns stdout and stderr, so while
/// it runs logs go to a file.
enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
}

fn init_tracing(target: &LogTarget<'_>) {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());
    match target {
        LogTarget::Stderr => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogTarget::File(path) => match open_log_file(path) {
            Ok(file) => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init(),
            Err(_) => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .init(),
        },
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn open_storage(flags: &ConfigFlags) -> Box<dyn Storage> {
    if flags.ephemeral {
        return Box::new(MemoryStorage::new().with_quota(flags.quota_bytes()));
    }
    Box::new(FileStorage::new(flags.data_dir_or_default()).with_quota(flags.quota_bytes()))
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let log_path = effective.log_path();
    let log_target = if cli.dump {
        LogTarget::Stderr
    } else {
        LogTarget::File(&log_path)
    };
    init_tracing(&log_target);
    tracing::debug!(?effective, "effective configuration");

    let store = DocumentStore::open(open_storage(&effective), effective.storage_key());

    if cli.dump {
        print!("{}", to_marked_text(&store.load_all()));
        return Ok(());
    }

    let mut app = App::new(store).with_triggers(!effective.no_triggers);
    app.run().context("Application error")
}
