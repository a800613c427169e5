//! Render demo policy templates from per-template schema files.
//!
//! Each schema becomes a runnable-looking `.pt` document under
//! `<out-dir>/<cloud>/<filename>.pt`, with datasources pointing at the fake
//! incident tables.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use ptl_scraper::generate::templates::render_template;
use ptl_scraper::TemplateSchema;

#[derive(Parser)]
#[command(name = "generate_fake_templates")]
#[command(about = "Render demo policy templates from extracted template schemas")]
struct Args {
    /// Directory of per-template schema JSON files
    #[arg(long, default_value = "generated_data/template_schema")]
    in_dir: PathBuf,

    /// Output directory for rendered templates
    #[arg(long, default_value = "templates")]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let mut paths: Vec<PathBuf> = fs::read_dir(&args.in_dir)
        .with_context(|| format!("reading {}", args.in_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    for path in paths {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let schema: TemplateSchema = match serde_json::from_str(&raw) {
            Ok(schema) => schema,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unparsable schema");
                continue;
            }
        };

        let Some(filename) = schema.filename.clone() else {
            warn!(path = %path.display(), "schema has no filename, skipping");
            continue;
        };

        let cloud_dir = args
            .out_dir
            .join(schema.cloud.as_deref().unwrap_or("").to_lowercase());
        fs::create_dir_all(&cloud_dir)
            .with_context(|| format!("creating {}", cloud_dir.display()))?;

        let outfile = cloud_dir.join(format!("{filename}.pt"));
        fs::write(&outfile, render_template(&schema))
            .with_context(|| format!("writing {}", outfile.display()))?;
        info!(path = %outfile.display(), "wrote demo template");
    }

    Ok(())
}
