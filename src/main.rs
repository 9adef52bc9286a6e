use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lenslog_catalog::db::Catalog;
use lenslog_catalog::{fix, import};

#[derive(Parser)]
#[command(name = "lenslog", version, about = "Catalog and GPS cleanup tools for a photo blog")]
struct Cli {
    /// Path to the catalog database.
    #[arg(long, default_value = "lenslog.db")]
    catalog: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import photos from a folder into the catalog.
    Import {
        /// Folder to scan for photos.
        folder: PathBuf,
    },
    /// Repair mis-signed GPS longitudes across the whole catalog.
    FixCoordinates,
    /// List catalog contents.
    List,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let catalog = Catalog::open(&cli.catalog)?;

    match cli.command {
        Command::Import { folder } => {
            let result = import::import_folder(&catalog, &folder)?;
            println!(
                "imported {} photos ({} already present, {} errors)",
                result.imported.len(),
                result.skipped,
                result.errors.len()
            );
            for err in &result.errors {
                eprintln!("  {err}");
            }
        }
        Command::FixCoordinates => {
            let result = fix::fix_coordinates(&catalog)?;
            println!(
                "corrected {} of {} photos",
                result.corrected, result.examined
            );
        }
        Command::List => {
            for photo in catalog.list_photos()? {
                let position = photo
                    .metadata
                    .as_ref()
                    .and_then(|m| m.coordinates.clone())
                    .or_else(|| {
                        photo
                            .metadata
                            .as_ref()
                            .and_then(|m| m.original_location.clone())
                    })
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:>5}  {}  {}  {}",
                    photo.id,
                    photo.date_taken.as_deref().unwrap_or("unknown date"),
                    position,
                    photo.file_path
                );
            }
        }
    }

    Ok(())
}
