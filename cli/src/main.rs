//! parseview CLI - render document parse results as annotated HTML

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

use parseview::batch::render_batch_with;
use parseview::render::DEFAULT_TITLE;
use parseview::{
    load_document, to_html_page, DocumentRenderer, ParsedInput, PageSelection, RenderOptions,
};

#[derive(Parser)]
#[command(name = "parseview")]
#[command(version)]
#[command(about = "Render document parse results as annotated HTML", long_about = None)]
struct Cli {
    /// Parse result JSON file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output HTML file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one parse result to HTML
    Render {
        /// Parse result JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page range (e.g., "1-3", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Maximum display width of page images in pixels
        #[arg(long, default_value = "1024", env = "PARSEVIEW_MAX_WIDTH")]
        max_width: u32,

        /// Tooltip character limit
        #[arg(long, default_value = "500")]
        tooltip_limit: usize,

        /// Page title
        #[arg(long, default_value = DEFAULT_TITLE)]
        title: String,

        /// Omit the element listing below each page
        #[arg(long)]
        no_listing: bool,
    },

    /// Render several parse results into one report
    Batch {
        /// Parse result JSON files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page range applied to every document
        #[arg(long)]
        pages: Option<String>,

        /// Maximum display width of page images in pixels
        #[arg(long, default_value = "1024", env = "PARSEVIEW_MAX_WIDTH")]
        max_width: u32,
    },

    /// Show parse result information
    Info {
        /// Parse result JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Render {
            input,
            output,
            pages,
            max_width,
            tooltip_limit,
            title,
            no_listing,
        }) => {
            let options = RenderOptions::new()
                .with_max_width(max_width)
                .with_tooltip_limit(tooltip_limit)
                .with_title(title)
                .with_listing(!no_listing);
            cmd_render(&input, output.as_deref(), pages.as_deref(), options)
        }
        Some(Commands::Batch {
            inputs,
            output,
            pages,
            max_width,
        }) => cmd_batch(&inputs, output.as_deref(), pages.as_deref(), max_width),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: render if input is provided
            if let Some(input) = cli.input {
                cmd_render(&input, cli.output.as_deref(), None, RenderOptions::default())
            } else {
                println!("{}", "Usage: parseview <FILE> [OUTPUT]".yellow());
                println!("       parseview --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_render(
    input: &Path,
    output: Option<&Path>,
    pages: Option<&str>,
    options: RenderOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("Rendering {}", input.display());
    let text = fs::read_to_string(input)?;
    let title = options.title.clone();

    let renderer = DocumentRenderer::new(options);
    let body = renderer.render(ParsedInput::json_text(text), pages);
    let page = to_html_page(&title, &body);

    write_output(output, &page)
}

fn cmd_batch(
    inputs: &[PathBuf],
    output: Option<&Path>,
    pages: Option<&str>,
    max_width: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    // Unreadable files become failed entries instead of aborting the batch
    let parsed: Vec<ParsedInput> = inputs
        .iter()
        .map(|path| match fs::read_to_string(path) {
            Ok(text) => ParsedInput::json_text(text),
            Err(e) => ParsedInput::from(json!({
                "type": "error",
                "message": format!("{}: {}", path.display(), e),
            })),
        })
        .collect();

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message("Rendering...");

    log::info!("Rendering batch of {} files", inputs.len());
    let renderer = DocumentRenderer::new(RenderOptions::new().with_max_width(max_width));
    let report = render_batch_with(&renderer, parsed, pages, |_| pb.inc(1));
    pb.finish_with_message("Done!");

    println!(
        "{} {} succeeded, {} failed",
        "Batch:".cyan().bold(),
        report.succeeded().to_string().green(),
        report.failed().to_string().red()
    );
    for (index, message) in report.failures() {
        let name = inputs
            .get(index)
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        println!("  {} {} {}", "✗".red(), name, message.dimmed());
    }

    let page = to_html_page("Batch Results", &report.to_html());
    write_output(output, &page)
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_document(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Document ID".bold(), doc.metadata.document_id());
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!("{}: {}", "Elements".bold(), doc.elements.len());

    let missing_images = doc.pages.iter().filter(|p| p.image_uri().is_none()).count();
    if missing_images > 0 {
        println!(
            "{}: {}",
            "Pages without image".bold(),
            missing_images.to_string().yellow()
        );
    }

    println!();
    println!("{}", "Element Types".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let counts = doc.type_counts();
    if counts.is_empty() {
        println!("{}", "None".dimmed());
    }
    for (kind, count) in counts {
        println!("{}: {}", kind.bold(), count);
    }

    println!();
    println!(
        "{}: {}",
        "Selection".bold(),
        PageSelection::all(doc.page_count()).describe()
    );

    Ok(())
}

fn write_output(output: Option<&Path>, html: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, html)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", html);
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "parseview".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document parse result viewer");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_flags() {
        let cli = Cli::parse_from(["parseview", "render", "r.json", "--pages", "1-2", "--no-listing"]);
        match cli.command {
            Some(Commands::Render {
                pages,
                no_listing,
                max_width,
                ..
            }) => {
                assert_eq!(pages.as_deref(), Some("1-2"));
                assert!(no_listing);
                assert_eq!(max_width, 1024);
            }
            _ => panic!("expected render command"),
        }
    }

    #[test]
    fn test_render_writes_html_page() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("result.json");
        let output = dir.path().join("result.html");
        fs::write(&input, r#"{"document": {"pages": [], "elements": []}}"#).unwrap();

        cmd_render(&input, Some(&output), None, RenderOptions::default()).unwrap();

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("No elements found in document"));
    }

    #[test]
    fn test_batch_reports_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("batch.html");
        let missing = dir.path().join("missing.json");

        cmd_batch(&[missing], Some(&output), None, 1024).unwrap();

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains("0 succeeded, 1 failed"));
        assert!(html.contains("missing.json"));
    }
}
