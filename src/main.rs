//! LWM2M device-profile tool.
//!
//! # Architecture Overview
//!
//! ```text
//!   profile.json ──▶ profile::load_document ──▶ ProfileSession::load
//!                                                   │
//!                              catalog (file|http) ◀┘ fetch templates
//!                                                   │
//!                                                   ▼
//!                                             ProfileTree ──▶ stdout (tree, add-objects)
//!                                                   │
//!                       edits (apply, remove-object, ota)
//!                                                   │
//!                                                   ▼
//!                      transform::flatten ──▶ profile::save_document ──▶ output.json
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use lwm2m_profile::catalog::{build_catalog, MemoryCatalog};
use lwm2m_profile::config::{load_config_or_default, AppConfig, DocumentWatcher};
use lwm2m_profile::model::ProfileTree;
use lwm2m_profile::observability::{logging, metrics};
use lwm2m_profile::ota::{UpdateChannel, UpdateStrategy};
use lwm2m_profile::profile::{load_document, save_document, validate_document, ConfigDocument};
use lwm2m_profile::session::ProfileSession;

#[derive(Parser)]
#[command(name = "lwm2m-profile")]
#[command(about = "Edit LWM2M device-profile observe/attribute/telemetry settings", long_about = None)]
struct Cli {
    /// Tool configuration (TOML). Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the projected tree as JSON
    Tree {
        #[arg(short, long)]
        document: PathBuf,
    },
    /// Project and flatten, writing the canonical document
    Normalize {
        #[arg(short, long)]
        document: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Flatten an edited tree onto the document
    Apply {
        #[arg(short, long)]
        document: PathBuf,
        #[arg(short, long)]
        tree: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Remove an object and every path that references it
    RemoveObject {
        #[arg(short, long)]
        document: PathBuf,
        #[arg(short, long)]
        key: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the tree with extra catalog objects merged in
    AddObjects {
        #[arg(short, long)]
        document: PathBuf,
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<String>,
    },
    /// List validation issues; exits non-zero if any
    Validate {
        #[arg(short, long)]
        document: PathBuf,
    },
    /// Change firmware/software update strategies
    Ota {
        #[arg(short, long)]
        document: PathBuf,
        #[arg(long)]
        firmware: Option<UpdateStrategy>,
        #[arg(long)]
        software: Option<UpdateStrategy>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Re-project the document whenever it changes
    Watch {
        #[arg(short, long)]
        document: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config_or_default(cli.config.as_deref())?;

    logging::init_logging(&config.observability);
    metrics::set_enabled(config.observability.metrics_enabled);

    tracing::info!(
        catalog = ?config.catalog.source,
        timeout_secs = config.catalog.timeout_secs,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Tree { document } => {
            let (_, tree) = open(&config, &document).await?;
            print_json(&tree)?;
        }
        Commands::Normalize { document, output } => {
            let (session, tree) = open(&config, &document).await?;
            let normalized = session.apply_edit(&tree);
            write(output.as_deref().unwrap_or(&document), &normalized)?;
        }
        Commands::Apply { document, tree, output } => {
            let (session, _) = open(&config, &document).await?;
            let edited: ProfileTree = serde_json::from_str(&std::fs::read_to_string(&tree)?)?;
            let updated = session.apply_edit(&edited);
            write(output.as_deref().unwrap_or(&document), &updated)?;
        }
        Commands::RemoveObject { document, key, output } => {
            let (session, mut tree) = open(&config, &document).await?;
            let (summary, updated) = session.remove_object(&mut tree, &key);
            tracing::info!(
                object = %key,
                node_removed = summary.node_removed,
                purged = summary.purged_entries,
                "Object removed"
            );
            write(output.as_deref().unwrap_or(&document), &updated)?;
        }
        Commands::AddObjects { document, ids } => {
            let (session, mut tree) = open(&config, &document).await?;
            let added = session.add_objects_by_id(&mut tree, &ids).await?;
            tracing::info!(added, "Objects merged");
            print_json(&tree)?;
        }
        Commands::Validate { document } => {
            let document = load_document(&document)?;
            if let Err(issues) = validate_document(&document) {
                for issue in &issues {
                    println!("{}", issue);
                }
                std::process::exit(1);
            }
            println!("ok");
        }
        Commands::Ota { document, firmware, software, output } => {
            let session = ProfileSession::new(
                Arc::new(MemoryCatalog::new()),
                config.catalog.timeout(),
                config.ota.defaults(),
            );
            session.submit(load_document(&document)?);
            if let Some(strategy) = firmware {
                session.set_ota_strategy(UpdateChannel::Firmware, strategy);
            }
            if let Some(strategy) = software {
                session.set_ota_strategy(UpdateChannel::Software, strategy);
            }
            match session.publishable_document() {
                Ok(updated) => write(output.as_deref().unwrap_or(&document), &updated)?,
                Err(issues) => {
                    for issue in &issues {
                        eprintln!("{}", issue);
                    }
                    std::process::exit(1);
                }
            }
        }
        Commands::Watch { document } => watch(&config, &document).await?,
    }

    Ok(())
}

fn new_session(config: &AppConfig) -> Result<ProfileSession, Box<dyn std::error::Error>> {
    let catalog = build_catalog(&config.catalog)?;
    Ok(ProfileSession::new(
        catalog,
        config.catalog.timeout(),
        config.ota.defaults(),
    ))
}

async fn open(
    config: &AppConfig,
    path: &Path,
) -> Result<(ProfileSession, ProfileTree), Box<dyn std::error::Error>> {
    let session = new_session(config)?;
    let document = load_document(path)?;
    let tree = session
        .load(document)
        .await?
        .ok_or("document was superseded while loading")?;
    Ok((session, tree))
}

async fn watch(config: &AppConfig, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let session = Arc::new(new_session(config)?);
    let (watcher, mut updates) = DocumentWatcher::new(path, config.watch.poll_interval());
    let _guard = watcher.run()?;

    report(&session, load_document(path)?).await;

    loop {
        tokio::select! {
            Some(document) = updates.recv() => {
                let session = Arc::clone(&session);
                tokio::spawn(async move { report(&session, document).await });
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }
    Ok(())
}

async fn report(session: &ProfileSession, document: ConfigDocument) {
    match session.load(document).await {
        Ok(Some(tree)) => {
            if let Err(e) = print_json(&tree) {
                tracing::error!(error = %e, "Failed to print tree");
            }
            if let Err(issues) = session.publishable_document() {
                for issue in issues {
                    tracing::warn!(issue = %issue, "Document not publishable");
                }
            }
        }
        Ok(None) => {}
        Err(e) => tracing::error!(error = %e, "Failed to load document"),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write(path: &Path, document: &ConfigDocument) -> Result<(), Box<dyn std::error::Error>> {
    save_document(path, document)?;
    tracing::info!(path = %path.display(), "Document written");
    Ok(())
}
