//! docdeck CLI - document to slide deck converter

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};

use docdeck::render::{self, MarkdownOptions};
use docdeck::{convert_file, detect_format_from_path, ConvertOptions, JsonFormat, DEFAULT_MAX_SLIDES};

#[derive(Parser)]
#[command(name = "docdeck")]
#[command(version)]
#[command(about = "Turn documents into slide deck descriptions", long_about = None)]
struct Cli {
    /// Input document (.docx, .pdf or .json item dump)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output JSON file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document to deck JSON
    Convert {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to <stem>_presentation.json)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Maximum number of slides
        #[arg(long, default_value_t = DEFAULT_MAX_SLIDES)]
        max_slides: usize,

        /// Keep every slide
        #[arg(long, conflicts_with = "max_slides")]
        no_limit: bool,

        /// Paragraph summary budget in characters
        #[arg(long, default_value = "500")]
        summary_budget: usize,

        /// Ask the renderer for decorative bars
        #[arg(long)]
        decorations: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Directory to keep extracted pictures in (defaults to
        /// <output stem>_media next to the output)
        #[arg(long, value_name = "DIR")]
        media_dir: Option<PathBuf>,
    },

    /// Print the slide outline
    Outline {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Render a Markdown handout instead
        #[arg(short, long)]
        markdown: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Maximum number of slides
        #[arg(long, default_value_t = DEFAULT_MAX_SLIDES)]
        max_slides: usize,
    },

    /// Show document information
    Info {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            max_slides,
            no_limit,
            summary_budget,
            decorations,
            compact,
            media_dir,
        }) => {
            let mut options = ConvertOptions::new()
                .with_summary_budget(summary_budget)
                .with_decorations(decorations);
            options = if no_limit {
                options.without_slide_limit()
            } else {
                options.with_max_slides(max_slides)
            };
            if let Some(dir) = media_dir {
                options = options.with_media_dir(dir);
            }
            cmd_convert(&input, output.as_deref(), &options, compact)
        }
        Some(Commands::Outline {
            input,
            markdown,
            output,
            max_slides,
        }) => cmd_outline(&input, markdown, output.as_deref(), max_slides),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), &ConvertOptions::default(), false)
            } else {
                println!("{}", "Usage: docdeck <FILE> [OUTPUT]".yellow());
                println!("       docdeck --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// `<stem>_presentation.json` next to the input, or `output` with a
/// `.json` extension ensured.
fn output_path(input: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(path) if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json")) => {
            path.to_path_buf()
        }
        Some(path) => {
            let mut name = path.as_os_str().to_os_string();
            name.push(".json");
            PathBuf::from(name)
        }
        None => {
            let stem = input.file_stem().unwrap_or_default().to_string_lossy();
            let file_name = format!("{}_presentation.json", stem);
            input.with_file_name(file_name)
        }
    }
}

/// `<stem>_media` next to `file`.
fn media_dir_for(file: &Path) -> PathBuf {
    let stem = file.file_stem().unwrap_or_default().to_string_lossy();
    file.with_file_name(format!("{}_media", stem))
}

/// Options with a media directory, defaulting to one next to `file`.
fn with_default_media_dir(options: &ConvertOptions, file: &Path) -> ConvertOptions {
    match options.media_dir {
        Some(_) => options.clone(),
        None => options.clone().with_media_dir(media_dir_for(file)),
    }
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    options: &ConvertOptions,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_path = output_path(input, output);
    let options = with_default_media_dir(options, &output_path);

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    pb.set_message("Building slides...");
    let deck = convert_file(input, &options)?.into_deck();
    pb.inc(1);

    pb.set_message("Serializing...");
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = render::to_json(&deck, format)?;
    pb.inc(1);

    pb.set_message("Writing...");
    fs::write(&output_path, &json)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!(
        "\n{} {} ({} slides)",
        "Saved to".green().bold(),
        output_path.display(),
        deck.slide_count()
    );
    if let Some(truncation) = deck.truncation {
        println!(
            "{} kept {} of {} slides",
            "Truncated:".yellow(),
            truncation.kept,
            truncation.produced
        );
    }
    if deck.stats.placeholder_count > 0 {
        println!(
            "{} {} pictures could not be resolved",
            "Warning:".yellow(),
            deck.stats.placeholder_count
        );
    }

    Ok(())
}

fn cmd_outline(
    input: &Path,
    markdown: bool,
    output: Option<&Path>,
    max_slides: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = ConvertOptions::new().with_max_slides(max_slides);
    if markdown {
        options = with_default_media_dir(&options, output.unwrap_or(input));
    }
    let deck = convert_file(input, &options)?.into_deck();

    let text = if markdown {
        render::to_markdown(&deck, &MarkdownOptions::default())
    } else {
        render::to_outline(&deck)
    };

    if let Some(path) = output {
        fs::write(path, &text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", text);
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let format = detect_format_from_path(input)?;
    let deck = convert_file(input, &ConvertOptions::new().without_slide_limit())?.into_deck();
    let stats = &deck.stats;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!(
        "{}: {} ({} LaTeX)",
        "Formulas".bold(),
        stats.formula_count,
        stats.latex_formula_count
    );
    println!("{}: {}", "Images".bold(), stats.image_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    println!();
    println!("{}: {}", "Slides".bold(), stats.slide_count);
    if stats.slide_count as usize > DEFAULT_MAX_SLIDES {
        println!(
            "  {} default limit of {} would drop {}",
            "└─".dimmed(),
            DEFAULT_MAX_SLIDES,
            stats.slide_count as usize - DEFAULT_MAX_SLIDES
        );
    }
    if stats.placeholder_count > 0 {
        println!("{}: {}", "Unresolved pictures".bold(), stats.placeholder_count);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docdeck".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document to slide deck converter");
}
