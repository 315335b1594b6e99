//! Image picker - runs one search against a directory of JSON fixtures
//!
//! Loads the picker configuration, activates the dialog (lookups), applies the
//! command-line search fields and prints the results.

mod fixtures;

use anyhow::Result;
use clap::Parser;
use picker_core::{
    ContentTypeId, EventBus, ImageDialogSearch, ImagePickerSettings, PickerConfig, SnapshotStore,
};
use std::path::PathBuf;
use std::sync::Arc;

use fixtures::FixtureApi;

#[derive(Parser, Debug)]
#[command(name = "image_picker", about = "Search images the way the picker dialog does")]
struct Args {
    /// Directory holding one `<resource>.json` file per API resource
    fixtures: PathBuf,

    /// Configuration file (defaults to the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content type to search (19 = Picto, 20 = GHT1T)
    #[arg(short = 't', long)]
    content_type: Option<u32>,

    /// Only images created by the current user
    #[arg(long)]
    mine: bool,

    /// User reported by the fixture API
    #[arg(long, default_value = "demo")]
    user: String,

    /// Zone codes to filter on
    #[arg(short, long)]
    zone: Vec<String>,

    /// Search keywords
    keywords: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    picker_log::init()?;
    if let Err(e) = picker_log::cleanup_old_logs(7) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    tracing::info!("Image picker starting...");

    let config = match &args.config {
        Some(path) => PickerConfig::load_from(path)?,
        None => PickerConfig::load().unwrap_or_default(),
    };

    let api = Arc::new(FixtureApi::new(&args.fixtures, &args.user));
    let bus = EventBus::new();
    let mut dialog = ImageDialogSearch::new(ImagePickerSettings::new(api, config), &bus, SnapshotStore::new());

    if let Err(e) = dialog.activate().await {
        tracing::error!("Activation failed: {}", e);
        eprintln!("{}", e.user_message());
        dialog.dispose();
        return Err(e.into());
    }

    let lookups = dialog.lookups();
    println!(
        "Lookups: {} zones, {} directories, {} sub-directories",
        lookups.zones.len(),
        lookups.cloudinary_directories.len(),
        lookups.cloudinary_sub_directories.len()
    );

    dialog.update_fields(|fields| {
        if let Some(id) = args.content_type {
            fields.content_type_id = ContentTypeId(id);
        }
        fields.my_images = args.mine;
        fields.code_zones = args.zone.clone();
        fields.keywords = args.keywords.join(" ");
    });

    println!("Searching {} with {}", dialog.api_resource_name(), dialog.search_arguments()?);
    let count = dialog.search().await?;
    println!("{} result(s)", count);
    for item in dialog.items().to_vec() {
        println!("  {}", item.id_as_url);
    }

    dialog.dispose();
    Ok(())
}
