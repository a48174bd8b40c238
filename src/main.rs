//! Main entry point for the mkdocx CLI application.
//!
//! Reads a text file or an image from disk, stdin or an HTTP URL and
//! writes a `.docx` into the current directory.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::Path;

use mkdocx::docx::{ImageFormat, ImageInput, PixelSize, build_image_docx, build_text_docx};
use mkdocx::io;
use mkdocx::{Cli, Command, DocxDocument};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let (data, source_name) = read_input(&cli).await?;
    let options = cli.build_options();

    let document = match &cli.command {
        Command::Text { .. } => {
            let text = String::from_utf8_lossy(&data);
            build_text_docx(&text, &options).context("failed to build text document")?
        }
        Command::Image {
            width,
            height,
            format,
            ..
        } => {
            let format = format
                .map(ImageFormat::from)
                .unwrap_or_else(|| ImageFormat::from_file_name(&source_name));
            let dimensions = match (width, height) {
                (Some(w), Some(h)) => Some(PixelSize::new(*w, *h)),
                _ => io::read_dimensions(&data),
            };
            let input = ImageInput {
                data,
                format,
                dimensions,
            };
            build_image_docx(input, &options).context("failed to build image document")?
        }
    };

    let output = cli.output_path(&source_name);
    write_output(&document, &output, &cli).await
}

/// Read the whole input, reporting network usage for URLs.
async fn read_input(cli: &Cli) -> Result<(Vec<u8>, String)> {
    let source = io::open(cli.input());
    let data = source.read_all().await?;
    if let Some(transferred) = source.transferred_bytes() {
        if !cli.is_quiet() {
            eprintln!("Total bytes transferred: {}", format_size(transferred));
        }
    }
    Ok((data, source.name().to_string()))
}

async fn write_output(document: &DocxDocument, output: &Path, cli: &Cli) -> Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    tokio::fs::write(output, document.as_bytes())
        .await
        .with_context(|| format!("cannot write {}", output.display()))?;

    if !cli.is_quiet() {
        println!(
            "  writing: {} ({})",
            output.display(),
            format_size(document.len() as u64)
        );
    }
    info!("wrote {} ({})", output.display(), document.mime_type());

    Ok(())
}

/// Format a byte size into a human-readable string.
///
/// ```ignore
/// assert_eq!(format_size(500), "500 bytes");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
