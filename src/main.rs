use std::path::PathBuf;

use clap::Parser;

use fleet_report::{Error, RenderOptions, WrapMetric};

/// Render a fleet audit, lease quotation or generic report manifest to PDF
#[derive(Parser, Debug)]
#[command(name = "fleet-report")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON manifest describing the report, its photos and logo
    input: PathBuf,

    /// Output PDF path
    #[arg(short, long, default_value = "report.pdf")]
    output: PathBuf,

    /// Wrap body text at this many characters per line
    #[arg(long, value_name = "N")]
    wrap_chars: Option<usize>,

    /// Photo thumbnail width in points
    #[arg(long, value_name = "PT")]
    thumb_width: Option<f32>,

    /// Wrap body text by Helvetica glyph widths instead of character count
    #[arg(long)]
    glyph_wrap: bool,

    /// Banner logo, overriding the manifest's
    #[arg(long, value_name = "FILE")]
    logo: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let mut opts = RenderOptions::default();
    if let Some(n) = cli.wrap_chars {
        opts.wrap_chars = n.max(1);
    }
    if let Some(w) = cli.thumb_width {
        opts.thumb_width = w.max(1.0);
    }
    if cli.glyph_wrap {
        opts.wrap_metric = WrapMetric::Helvetica;
    }

    let outcome = fleet_report::convert_manifest_with_logo(
        &cli.input,
        &cli.output,
        cli.logo.as_deref(),
        &opts,
    )?;

    println!(
        "{} -> {} ({} pages, {} photos, {} skipped)",
        cli.input.display(),
        cli.output.display(),
        outcome.page_count,
        outcome.photos_placed,
        outcome.photos_skipped,
    );
    Ok(())
}
