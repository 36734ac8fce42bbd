//! procdoc CLI - process documentation export tool

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use procdoc::render::HtmlRenderer;
use procdoc::{
    file_stem, parse_body, Artifact, ExportFormat, ExportOptions, Exporter, Screenshot,
    SourceDocument,
};

#[derive(Parser)]
#[command(name = "procdoc")]
#[command(version)]
#[command(about = "Export step-by-step process documents to PDF and text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a document to a paginated PDF
    Pdf {
        #[command(flatten)]
        doc: DocArgs,

        /// Output directory (current directory if not specified)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// JSON file with export options
        #[arg(long, value_name = "FILE", env = "PROCDOC_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Export a document to flat text
    #[command(alias = "txt")]
    Text {
        #[command(flatten)]
        doc: DocArgs,

        /// Output directory (stdout if not specified)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Render the HTML preview
    Preview {
        #[command(flatten)]
        doc: DocArgs,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// JSON file with export options
        #[arg(long, value_name = "FILE", env = "PROCDOC_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Print the parsed block model as JSON
    Blocks {
        /// Body file ("-" for stdin)
        #[arg(value_name = "BODY")]
        body: PathBuf,

        /// Compact output (no pretty printing)
        #[arg(long)]
        compact: bool,
    },

    /// Write each page as a PNG image
    Pages {
        #[command(flatten)]
        doc: DocArgs,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// JSON file with export options
        #[arg(long, value_name = "FILE", env = "PROCDOC_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

/// Document inputs shared by the export commands.
#[derive(Args)]
struct DocArgs {
    /// Body file ("-" for stdin)
    #[arg(value_name = "BODY")]
    body: PathBuf,

    /// Document title
    #[arg(short, long, env = "PROCDOC_TITLE")]
    title: String,

    /// Screenshot file (repeatable, in order)
    #[arg(short, long = "image", value_name = "FILE")]
    images: Vec<PathBuf>,
}

impl DocArgs {
    fn load(&self) -> Result<SourceDocument, Box<dyn std::error::Error>> {
        let body = read_body(&self.body)?;
        let mut doc = SourceDocument::new(self.title.clone(), body);
        for path in &self.images {
            doc.screenshots.push(Screenshot::from_path(path)?);
        }
        log::debug!(
            "Loaded document '{}' with {} screenshots",
            doc.title,
            doc.screenshots.len()
        );
        Ok(doc)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Pdf {
            doc,
            output,
            config,
        } => cmd_pdf(&doc, output.as_deref(), config.as_deref()),
        Commands::Text { doc, output } => cmd_text(&doc, output.as_deref()),
        Commands::Preview {
            doc,
            output,
            config,
        } => cmd_preview(&doc, output.as_deref(), config.as_deref()),
        Commands::Blocks { body, compact } => cmd_blocks(&body, compact),
        Commands::Pages {
            doc,
            output,
            config,
        } => cmd_pages(&doc, &output, config.as_deref()),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn read_body(path: &Path) -> std::io::Result<String> {
    if path.as_os_str() == "-" {
        let mut body = String::new();
        std::io::stdin().read_to_string(&mut body)?;
        Ok(body)
    } else {
        fs::read_to_string(path)
    }
}

fn load_options(config: Option<&Path>) -> Result<ExportOptions, Box<dyn std::error::Error>> {
    match config {
        Some(path) => Ok(ExportOptions::from_file(path)?),
        None => Ok(ExportOptions::default()),
    }
}

fn report_saved(artifact: &Artifact, path: &Path) {
    println!("{} {}", "Saved to".green(), path.display());
    if let Some(pages) = artifact.page_count {
        println!("  {} {} pages, {} bytes", "└─".dimmed(), pages, artifact.len());
    }
}

fn cmd_pdf(
    args: &DocArgs,
    output: Option<&Path>,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = args.load()?;
    let exporter = Exporter::with_options(load_options(config)?);
    let artifact = exporter.export(&doc, ExportFormat::Pdf)?;

    let dir = output.unwrap_or_else(|| Path::new("."));
    let path = artifact.save_to(dir)?;
    report_saved(&artifact, &path);

    Ok(())
}

/// Write the artifact bytes unchanged.
fn write_artifact<W: Write>(out: &mut W, artifact: &Artifact) -> std::io::Result<()> {
    out.write_all(&artifact.bytes)?;
    out.flush()
}

fn cmd_text(args: &DocArgs, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let doc = args.load()?;
    let artifact = Exporter::new().export(&doc, ExportFormat::Text)?;

    if let Some(dir) = output {
        let path = artifact.save_to(dir)?;
        report_saved(&artifact, &path);
    } else {
        write_artifact(&mut std::io::stdout().lock(), &artifact)?;
    }

    Ok(())
}

fn cmd_preview(
    args: &DocArgs,
    output: Option<&Path>,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = args.load()?;
    let options = load_options(config)?;
    let html = HtmlRenderer::new(options.layout).render(&doc);

    if let Some(path) = output {
        fs::write(path, &html)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", html);
    }

    Ok(())
}

fn cmd_blocks(body: &Path, compact: bool) -> Result<(), Box<dyn std::error::Error>> {
    let blocks = parse_body(&read_body(body)?);
    let json = if compact {
        serde_json::to_string(&blocks)?
    } else {
        serde_json::to_string_pretty(&blocks)?
    };
    println!("{}", json);
    Ok(())
}

fn cmd_pages(
    args: &DocArgs,
    output: &Path,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = args.load()?;
    let exporter = Exporter::with_options(load_options(config)?);
    let pages = exporter.render_pages(&doc)?;

    fs::create_dir_all(output)?;
    let stem = file_stem(&doc.title);

    println!("{}", "Output files:".green().bold());
    for (index, page) in pages.iter().enumerate() {
        let name = format!("{}_page_{:03}.png", stem, page.number);
        fs::write(output.join(&name), page.encode_png()?)?;

        let branch = if index + 1 == pages.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), name);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "procdoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Process documentation export tool");
    println!();
    println!("Library: procdoc {}", procdoc::VERSION);
    println!("License: MIT");
}
