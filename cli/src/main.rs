//! deckshot CLI - screenshot injection for PowerPoint decks
//!
//! With no arguments, backs up `StockFlow_Pitch_Deck.pptx`, writes the
//! annotated and showcase decks next to it and prints progress.

use clap::{Parser, Subcommand};
use colored::*;
use deckshot::pptx::shapes::LINE_BREAK;
use deckshot::updater::TEXT_PREVIEW_CHARS;
use deckshot::{AnnotateReport, DeckConfig, DeckUpdater, Presentation, ShowcaseReport};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Screenshot injection for PowerPoint decks
#[derive(Parser)]
#[command(
    name = "deckshot",
    author = "iyulab",
    version,
    about = "Inject application screenshots into a PowerPoint deck",
    long_about = "deckshot - Inject application screenshots into a PowerPoint deck.\n\n\
                  Without a subcommand, writes an updated deck with screenshots on slides 3-5 \
                  and a copy with an appended screenshot showcase slide."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// JSON file overriding the built-in paths and positions
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory that relative paths are resolved against
    #[arg(short = 'C', long)]
    workdir: Option<PathBuf>,

    /// Print the run report as JSON instead of progress lines
    #[arg(long)]
    json: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the slides of a deck and the shapes on each
    Inspect {
        /// Input file path
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("deckshot=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Some(Commands::Inspect { input }) => inspect(&input)?,
        Some(Commands::Version) => print_version(),
        None => {
            let mut config = match &cli.config {
                Some(path) => DeckConfig::from_json_file(path)?,
                None => DeckConfig::default(),
            };
            if let Some(dir) = &cli.workdir {
                config = config.rooted_at(dir);
            }
            update_decks(DeckUpdater::new(config), cli.json)?;
        }
    }

    Ok(())
}

fn update_decks(updater: DeckUpdater, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let report = updater.run()?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} Starting PowerPoint update...\n", "▶".cyan().bold());

    let backup = updater.write_backup()?;
    if let Some(path) = &backup {
        println!("{} Created backup: {}", "✓".green().bold(), path.display());
    }

    let pb = create_spinner("Adding screenshots to slides...");
    let annotate = updater.annotate_after_backup(backup);
    pb.finish_and_clear();
    print_annotate(&annotate?);

    let pb = create_spinner("Building screenshot showcase...");
    let showcase = updater.showcase();
    pb.finish_and_clear();
    print_showcase(&showcase?);

    println!("\n{} Done!", "✓".green().bold());
    Ok(())
}

fn print_annotate(report: &AnnotateReport) {
    println!("Loaded presentation with {} slides", report.slide_count);

    for slide in &report.slides {
        println!("\n{} Processing Slide {}...", "•".blue().bold(), slide.number);
        for shape in &slide.shapes {
            if shape.is_picture() {
                println!("  Found image: {}", shape.name);
            }
            if let Some(text) = shape.text_preview(TEXT_PREVIEW_CHARS) {
                println!("  Text: {}...", text);
            }
        }
        if let Some(inserted) = &slide.inserted {
            println!(
                "  {} Added {} screenshot",
                "✓".green().bold(),
                inserted.key.label().to_lowercase()
            );
        }
    }

    println!(
        "\n{} Saved updated presentation: {}",
        "✓".green().bold(),
        report.output.display()
    );
    println!("{}: {}", "Total updates made".bold(), report.updates_made);
}

fn print_showcase(report: &ShowcaseReport) {
    println!(
        "{} Created screenshot showcase: {} (slide {}, {} screenshots)",
        "✓".green().bold(),
        report.output.display(),
        report.slide_number,
        report.placements.len()
    );
}

fn inspect(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let pb = create_spinner("Analyzing presentation...");
    let deck = Presentation::open(input)?;
    let mut slides = Vec::with_capacity(deck.slide_count());
    for index in 0..deck.slide_count() {
        slides.push(deck.shapes(index)?);
    }
    pb.finish_and_clear();

    println!("{}", "Presentation Information".cyan().bold());
    println!("{}", "─".repeat(40));
    println!(
        "{}: {}",
        "File".bold(),
        input.file_name().unwrap_or_default().to_string_lossy()
    );
    println!("{}: {}", "Slides".bold(), deck.slide_count());
    println!("{}: {}", "Layouts".bold(), deck.layout_count());

    for (index, shapes) in slides.iter().enumerate() {
        println!("\n{} {}", "Slide".cyan().bold(), index + 1);
        if shapes.is_empty() {
            println!("  {}", "(no shapes)".dimmed());
        }
        for shape in shapes {
            print!("  #{} {} [{:?}]", shape.id, shape.name, shape.kind);
            match shape.text_preview(TEXT_PREVIEW_CHARS) {
                Some(text) => println!(
                    " {}",
                    text.replace('\n', " / ").replace(LINE_BREAK, " ").dimmed()
                ),
                None => println!(),
            }
        }
    }

    Ok(())
}

fn print_version() {
    println!("{} {}", "deckshot".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Inject application screenshots into PowerPoint decks");
    println!();
    println!("Supported formats: PPTX, PPTM, PPSX, POTX");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
