// ABOUTME: Main entry point for the campaign-editor program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use anyhow::Context;
use campaign_editor::model::parse_priority;
use campaign_editor::validator::{
    export_blocker, has_inconsistent_aspect_ratios, has_mismatched_aspect_ratio, image_url_error,
};
use campaign_editor::{
    CampaignStore, CancelToken, Category, Config, Editor, HttpImageProbe, ImageProbe,
    JsonFileList, PlacementType, SlideField,
};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reduce pixel dimensions to an aspect ratio
    Ratio { width: u32, height: u32 },

    /// Verify and measure a remote image
    Probe { url: String },

    /// Build a campaign from images and print the exported JSON
    Build(BuildArgs),

    /// Import a campaign document and report whether it can be exported
    Check {
        /// Path to the JSON document (plain or double-encoded)
        file: PathBuf,
    },

    /// List saved campaigns
    List,
}

#[derive(Args)]
struct BuildArgs {
    /// Placement type: single or carousel
    #[arg(long = "type", default_value = "carousel")]
    placement_type: String,

    /// Position on page
    #[arg(short, long)]
    position: String,

    /// App category: luxury or fashion
    #[arg(short, long, default_value = "luxury")]
    category: String,

    /// Page id, or "other" together with --custom-page-id
    #[arg(long)]
    page_id: String,

    #[arg(long)]
    custom_page_id: Option<String>,

    /// Target aspect ratio
    #[arg(long)]
    aspect_ratio: Option<String>,

    /// Priority number; empty means unset
    #[arg(long, default_value = "")]
    priority: String,

    /// Image URLs in slide order
    #[arg(short, long = "image", value_delimiter = ',', required = true)]
    images: Vec<String>,

    /// Redirect links, matched to images by position
    #[arg(short, long = "link", value_delimiter = ',')]
    links: Vec<String>,

    /// Captions, matched to images by position
    #[arg(long = "caption")]
    captions: Vec<String>,

    /// Save the exported document under this name
    #[arg(long)]
    save: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Probe timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

async fn build(config: &Config, args: &BuildArgs) -> anyhow::Result<()> {
    let editor_config = config.editor_config(args.timeout_ms);
    let probe = HttpImageProbe::new(editor_config.probe_timeout)?;
    let editor = Editor::new(probe, editor_config);

    editor.set_type(args.placement_type.parse::<PlacementType>()?);
    // Category first: switching it resets page id and position
    editor.set_category(args.category.parse::<Category>()?);
    if let Some(error) = editor.set_position(&args.position) {
        anyhow::bail!(error);
    }
    if let Some(error) = editor.set_page_id(&args.page_id) {
        anyhow::bail!(error);
    }
    if let Some(custom) = &args.custom_page_id {
        if let Some(error) = editor.set_custom_page_id(custom) {
            anyhow::bail!(error);
        }
    }
    if let Some(ratio) = &args.aspect_ratio {
        editor.set_aspect_ratio(ratio);
    }
    editor.set_priority(parse_priority(&args.priority)?);

    let cancel = CancelToken::new();
    for url in &args.images {
        if let Some(error) = image_url_error(url.trim()) {
            anyhow::bail!("{}: {}", error, url);
        }
        editor
            .add_image(url, None, &cancel)
            .await
            .with_context(|| format!("Failed to add image {}", url))?;
    }
    for (index, link) in args.links.iter().enumerate() {
        editor.update_field(index, SlideField::Link, link)?;
    }
    for (index, caption) in args.captions.iter().enumerate() {
        editor.update_field(index, SlideField::Caption, caption)?;
    }

    let document = match &args.save {
        Some(name) => {
            let mut store = CampaignStore::open(JsonFileList::new(&config.store_path))?;
            let document = editor.export_and_save(name, &mut store)?;
            eprintln!("Saved campaign {:?} to {:?}", name, config.store_path);
            document
        }
        None => editor.export()?,
    };

    if args.pretty {
        println!("{}", document.to_pretty_json()?);
    } else {
        println!("{}", document.to_json()?);
    }
    Ok(())
}

async fn check(config: &Config, file: &Path) -> anyhow::Result<()> {
    let raw = fs::read_to_string(file)
        .with_context(|| format!("Failed to read campaign file {:?}", file))?;
    let editor_config = config.editor_config(None);
    let probe = HttpImageProbe::new(editor_config.probe_timeout)?;
    let editor = Editor::new(probe, editor_config);

    editor.import(&raw, &CancelToken::new()).await?;
    let state = editor.state();

    for (index, slide) in state.slides().iter().enumerate() {
        if has_mismatched_aspect_ratio(slide) {
            println!(
                "Warning: slide {} is {} but the placement renders at {}",
                index, slide.display_aspect_ratio, slide.aspect_ratio
            );
        }
    }
    if has_inconsistent_aspect_ratios(state.slides()) {
        println!("Warning: Images have different aspect ratios. This may affect the display consistency.");
    }

    match export_blocker(state.context(), state.slides(), editor.config().link_policy) {
        Some(blocker) => anyhow::bail!(blocker.to_string()),
        None => println!("Campaign is ready to export ({} slides)", state.slides().len()),
    }
    Ok(())
}

async fn probe(config: &Config, url: &str) -> anyhow::Result<()> {
    if let Some(error) = image_url_error(url) {
        anyhow::bail!("{}: {}", error, url);
    }
    let probe = HttpImageProbe::new(config.editor_config(None).probe_timeout)?;
    if !probe.verify_load(url).await? {
        anyhow::bail!("Image failed to load. Please check the URL.");
    }
    let dimensions = probe.measure(url).await?;
    println!(
        "{}x{} ({})",
        dimensions.width,
        dimensions.height,
        dimensions.aspect_ratio()
    );
    Ok(())
}

fn list(config: &Config) -> anyhow::Result<()> {
    let store = CampaignStore::open(JsonFileList::new(&config.store_path))?;
    if store.entries().is_empty() {
        println!("No saved campaigns.");
    }
    for entry in store.entries() {
        println!("{}\t{}", entry.name, entry.saved_at.to_rfc3339());
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::from_env();

    let result = match &cli.command {
        Some(Commands::Ratio { width, height }) => {
            if *width == 0 || *height == 0 {
                Err(anyhow::anyhow!("Width and height must be positive"))
            } else {
                println!("{}", campaign_editor::reduce_ratio(*width, *height));
                Ok(())
            }
        }
        Some(Commands::Probe { url }) => probe(&config, url).await,
        Some(Commands::Build(args)) => build(&config, args).await,
        Some(Commands::Check { file }) => check(&config, file).await,
        Some(Commands::List) => list(&config),
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
