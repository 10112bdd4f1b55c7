//! folio CLI - page normalization for PDF-to-ebook conversion

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use folio::render::page_to_xhtml;
use folio::{
    detect_source_from_path, ContentHasher, Folio, JsonFormat, NormalizationDriver,
    OutputFormat, Page, PageSequence, SourceKind, StopwordDetector,
};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(
    about = "Strip running headers, footers and page numbers from extracted PDF pages",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a document and write the packaged book
    Convert {
        /// Input file (pdftotext or pdftohtml output)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: FormatArg,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Book title (overrides any guessed title)
        #[arg(long)]
        title: Option<String>,

        /// Treat the input as form-feed delimited text
        #[arg(long, conflicts_with = "force_html")]
        force_text: bool,

        /// Treat the input as <hr> separated HTML
        #[arg(long)]
        force_html: bool,

        /// Maximum normalization passes
        #[arg(long, default_value = "20")]
        max_iterations: usize,

        /// Also write one XHTML file per page and the referenced images to DIR
        #[arg(long, value_name = "DIR")]
        package: Option<PathBuf>,
    },

    /// Show what normalization detects in a document
    Info {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Convert many documents in parallel
    Batch {
        /// Input files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: FormatArg,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Packaged book as JSON
    Json,
    /// Cleaned plain text
    Text,
    /// Single XHTML document
    Xhtml,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Xhtml => OutputFormat::Xhtml,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            format,
            compact,
            title,
            force_text,
            force_html,
            max_iterations,
            package,
        }) => {
            let mut folio = Folio::new()
                .with_format(format.into())
                .with_max_iterations(max_iterations)
                .with_images(package.is_some());
            if compact {
                folio = folio.with_json_format(JsonFormat::Compact);
            }
            if let Some(title) = title {
                folio = folio.with_title(title);
            }
            if force_text {
                folio = folio.force_text();
            } else if force_html {
                folio = folio.force_html();
            }
            cmd_convert(&folio, &input, output.as_deref(), package.as_deref())
        }
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Batch {
            inputs,
            output,
            format,
        }) => cmd_batch(&inputs, &output, format.into()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: folio <COMMAND> <FILE>".yellow());
            println!("       folio --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_convert(
    folio: &Folio,
    input: &Path,
    output: Option<&Path>,
    package: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = folio.convert(input)?;

    if !result.report.converged {
        eprintln!(
            "{} normalization stopped after {} passes without converging",
            "Warning:".yellow().bold(),
            result.report.iterations
        );
    }

    if let Some(dir) = package {
        fs::create_dir_all(dir)?;
        let book = &result.book;
        for page in &book.pages {
            fs::write(dir.join(&page.file_name), page_to_xhtml(page, book.language.as_deref()))?;
        }
        let mut written = 0;
        for image in &book.images {
            if let Some(data) = &image.data {
                fs::write(dir.join(image.file_name()), data)?;
                written += 1;
            }
        }
        println!(
            "{} {} pages, {} images to {}",
            "Packaged".green(),
            book.page_count(),
            written,
            dir.display()
        );
    }

    if let Some(path) = output {
        fs::write(path, &result.content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", result.content);
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = detect_source_from_path(input)?;
    let bytes = fs::read(input)?;
    let content = String::from_utf8_lossy(&bytes);

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Source".bold(), source);

    match source {
        SourceKind::Text => print_normalization(PageSequence::from_text(&content)?),
        SourceKind::Html => print_normalization(PageSequence::from_html_document(&content)?),
    }

    Ok(())
}

fn print_normalization<P: Page>(mut pages: PageSequence<P>) {
    let detector = StopwordDetector::new();
    let before = ContentHasher::new().fingerprint(&pages);

    println!("{}: {}", "Pages".bold(), pages.len());
    println!("{}: {}", "Fingerprint".bold(), before);

    let report = NormalizationDriver::new().run(&mut pages);

    println!();
    println!("{}", "Normalization".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let list = |found: &[String]| {
        if found.is_empty() {
            "none".dimmed().to_string()
        } else {
            found.join(" | ")
        }
    };
    println!("{}: {}", "Headers".bold(), list(&report.headers));
    println!("{}: {}", "Footers".bold(), list(&report.footers));
    println!("{}: {:?}", "Page numbers".bold(), report.page_number_position);
    println!(
        "{}: {} ({})",
        "Passes".bold(),
        report.iterations,
        if report.converged { "converged" } else { "capped" }
    );
    println!("{}: {}", "Fingerprint".bold(), report.fingerprint);
    println!(
        "{}: {}",
        "Language".bold(),
        pages.dominant_lang(&detector).unwrap_or_else(|| "unknown".to_string())
    );

    let empty = pages.iter().filter(|p| p.is_empty()).count();
    let images: usize = pages.iter().map(|p| p.images().len()).sum();
    println!("{}: {}", "Empty pages".bold(), empty);
    println!("{}: {}", "Images".bold(), images);
}

fn cmd_batch(
    inputs: &[PathBuf],
    output: &Path,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output)?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    log::debug!("Batch output directory: {}", output.display());

    let folio = Folio::new().with_format(format);
    let items = folio.convert_batch(inputs, |path| {
        pb.set_message(path.display().to_string());
        pb.inc(1);
    });
    pb.finish_and_clear();

    let mut failures = 0;
    for item in items {
        match item.result {
            Ok(result) => {
                let stem = item.path.file_stem().unwrap_or_default().to_string_lossy();
                let target = output.join(format!("{}.{}", stem, format.extension()));
                fs::write(&target, &result.content)?;
                println!("{} {}", "✓".green(), target.display());
            }
            Err(e) => {
                failures += 1;
                eprintln!("{} {}: {}", "✗".red(), item.path.display(), e);
            }
        }
    }

    println!(
        "\n{} {} converted, {} failed",
        "Done!".green().bold(),
        inputs.len() - failures,
        failures
    );

    if failures > 0 {
        return Err(format!("{} documents failed", failures).into());
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "folio".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Page normalization for PDF-to-ebook conversion");
    println!();
    println!("License: MIT");
}
