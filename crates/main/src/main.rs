use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wostup_brief::content::{self, DEFAULT_OUTPUT_FILE};
use wostup_brief::PdfBuilder;

/// Renders the Wostup post analytics dashboard brief.
///
/// Fonts are looked up under `assets/fonts` next to the binary or the
/// `wostup_brief` crate, in `WOSTUP_BRIEF_FONTS_DIR`, or in the common
/// Liberation Sans system directories.
#[derive(Parser)]
#[command(name = "wostup-brief", author, version, about = "Render the post analytics dashboard brief")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the brief to a PDF file (the default).
    Render(RenderArgs),

    /// Print the title and section headings in document order.
    Outline,
}

#[derive(Args, Default)]
struct RenderArgs {
    /// Output file.
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Directory searched for fonts before the standard locations.
    #[arg(long)]
    fonts_dir: Option<PathBuf>,

    /// Print a page number in the footer of every page.
    #[arg(long)]
    page_numbers: bool,

    /// Do not add a bookmark per section.
    #[arg(long)]
    no_bookmarks: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Render(args)) => render(args),
        Some(Commands::Outline) => outline(),
        None => render(RenderArgs {
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            ..RenderArgs::default()
        }),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn render(args: RenderArgs) -> Result<(), Box<dyn Error>> {
    let mut builder =
        PdfBuilder::new(content::post_analytics_brief()).with_page_numbers(args.page_numbers);
    if let Some(directory) = args.fonts_dir {
        builder = builder.with_fonts_dir(directory);
    }

    #[cfg(feature = "bookmarks")]
    {
        builder = builder.with_bookmarks(!args.no_bookmarks);
    }
    #[cfg(not(feature = "bookmarks"))]
    let _ = args.no_bookmarks;

    builder.write_to(&args.output)?;
    println!("PDF generated successfully: {}", args.output.display());
    Ok(())
}

fn outline() -> Result<(), Box<dyn Error>> {
    let flow = PdfBuilder::new(content::post_analytics_brief()).flow()?;
    println!("{}", content::TITLE);
    for (index, heading) in flow.headings().enumerate() {
        println!("{:>2}. {}", index + 1, heading);
    }
    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
