mod config;
mod executor;
mod icons;
mod matcher;
mod model;
mod sources;
mod state;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{error, warn};
use std::path::{Path, PathBuf};

use crate::config::{Config, load_config, load_config_from};
use crate::icons::IconResolver;
use crate::model::{Catalog, Entry};
use crate::sources::{desktop::DesktopSource, items::StaticSource};
use crate::state::{AppState, Event, Key, Outcome};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file to use instead of the per-user one
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scan only this applications directory, ignoring the configured ones
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print every visible application
    List {
        #[arg(long)]
        json: bool,
    },
    /// Print the applications whose name or description contains QUERY
    Search {
        query: String,
        #[arg(long)]
        json: bool,
    },
    /// Show which image an icon name resolves to
    Icon { name: Option<String> },
    /// Launch what pressing Enter after typing QUERY would launch
    Run {
        #[arg(default_value = "")]
        query: String,
        /// Launch the N-th match (0-based) instead of the top hit
        #[arg(short, long)]
        index: Option<usize>,
        /// Print the command instead of running it
        #[arg(long)]
        dry_run: bool,
    },
    /// Run the configured logout command
    Logout {
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    };
    let config = loaded.unwrap_or_else(|e| {
        warn!("{}; using built-in defaults", e);
        Config::default()
    });

    match args.command {
        Cmd::List { json } => {
            let catalog = build_catalog(&config, args.dir.as_deref());
            print_entries(&catalog.entries().iter().collect::<Vec<_>>(), json)?;
        }
        Cmd::Search { query, json } => {
            let catalog = build_catalog(&config, args.dir.as_deref());
            print_entries(&matcher::filter(catalog.entries(), &query), json)?;
        }
        Cmd::Icon { name } => {
            let handle = IconResolver::new(config.icons_dir.clone()).resolve(name.as_deref());
            if handle.is_fallback() {
                warn!("No usable icon for {:?}, using the generic one", name);
            }
            println!("{}", serde_json::to_string_pretty(&handle)?);
        }
        Cmd::Run { query, index, dry_run } => {
            let mut state = AppState::new(build_catalog(&config, args.dir.as_deref()), config.logout_command.clone());
            state.handle(Event::QueryChanged(query));
            let outcome = match index {
                Some(i) => state.handle(Event::EntryActivated(i)),
                None => state.handle(Event::KeyPressed(Key::Enter)),
            };
            finish(outcome, dry_run);
        }
        Cmd::Logout { dry_run } => {
            let mut state = AppState::new(Catalog::default(), config.logout_command.clone());
            finish(state.handle(Event::LogoutRequested), dry_run);
        }
    }

    Ok(())
}

fn build_catalog(config: &Config, dir: Option<&Path>) -> Catalog {
    let catalog = match dir {
        Some(dir) => Catalog::build(dir),
        None => {
            let items = StaticSource::new(config.items.clone());
            let desktop = DesktopSource::new(config.applications_dirs.clone());
            Catalog::from_sources(&[&items, &desktop])
        }
    };
    if catalog.is_empty() {
        warn!("No applications found");
    }
    catalog
}

fn print_entries(entries: &[&Entry], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }
    for entry in entries {
        println!("{}\t{}\t{}", entry.name, entry.command, entry.icon_ref());
    }
    Ok(())
}

/// Dispatches the command carried by an exit outcome. A failed spawn is only
/// reported: the launcher closes either way.
fn finish(outcome: Outcome, dry_run: bool) {
    let Outcome::Exit(Some(command)) = outcome else {
        return;
    };

    if dry_run {
        println!("{}", command);
    } else if let Err(e) = executor::dispatch(&command) {
        error!("{}", e);
    }
}
