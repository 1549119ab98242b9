//! Look up a url, print the preview and write the card as HTML and PNG.
//!
//! ```text
//! LINK_CARD_FALLBACK_API_KEY=... cargo run --example link_card --features logging -- \
//!     https://www.rust-lang.org --card-type twitter --out target/cards
//! ```

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use link_preview_card::{
    render_page, CardExporter, CardType, PreviewController, PreviewError, ProviderConfig,
};
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(about = "Render a link preview card")]
struct Args {
    /// Url to preview
    url: String,

    /// "Type 1" or "Type 2" / "twitter"
    #[arg(long, default_value = "Type 1")]
    card_type: CardType,

    #[arg(long)]
    card_width: Option<u32>,

    #[arg(long)]
    card_height: Option<u32>,

    #[arg(long)]
    card_radius: Option<u32>,

    #[arg(long)]
    image_radius: Option<u32>,

    /// Directory receiving card.html and link-preview.png
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    #[cfg(feature = "logging")]
    link_preview_card::setup_logging(link_preview_card::LogConfig::default())?;

    let mut controller = PreviewController::new_with_config(&ProviderConfig::from_env())?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Fetching preview for {}", args.url));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let state = controller.lookup(args.url.as_str()).await;
    spinner.finish_and_clear();

    if let Some(message) = state.error() {
        eprintln!("{}: {}", "Error".bold().red(), message);
        std::process::exit(1);
    }

    controller.select_card_type(args.card_type);
    for (field, value) in [
        ("cardWidth", args.card_width),
        ("cardHeight", args.card_height),
        ("cardRadius", args.card_radius),
        ("imageRadius", args.image_radius),
    ] {
        if let Some(value) = value {
            controller.edit_customization(field, value);
        }
    }

    let state = controller.state();
    let result = state
        .result()
        .ok_or_else(|| PreviewError::ExportError("No card is displayed".into()))?;

    #[cfg(feature = "logging")]
    link_preview_card::log_preview_card(result, &args.url);

    println!("\n{}", "Link Preview".bold().blue());
    println!("{}", "---------------".blue());
    println!("{}: {}", "Title".bold(), result.title);
    println!("{}: {}", "Description".bold(), result.description);
    println!("{}: {}", "Image".bold(), result.image);
    println!("{}: {}", "Publisher".bold(), result.publisher);
    println!("{}: {}", "Card".bold(), state.card_type);

    tokio::fs::create_dir_all(&args.out).await?;
    let html_path = args.out.join("card.html");
    let html = render_page(result, &state.customization, state.card_type);
    tokio::fs::write(&html_path, html.into_string()).await?;
    println!("{}: {}", "HTML".bold(), html_path.display());

    let exporter = CardExporter::new();
    match controller.export_to_dir(&exporter, &args.out).await {
        Ok(path) => println!("{}: {}", "PNG".bold(), path.display()),
        Err(e) => {
            #[cfg(feature = "logging")]
            link_preview_card::log_error_card(&args.url, &e);
            eprintln!("{}: {}", "Export failed".bold().red(), e);
        }
    }

    Ok(())
}
