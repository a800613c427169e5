//! Fetch every listed policy template and write one schema JSON per template.
//!
//! Usage:
//!   cargo run --bin generate_template_schema
//!   cargo run --bin generate_template_schema -- --list lists/template_list.json --out-dir generated_data/template_schema

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use ptl_scraper::fetch::{
    load_template_list, template_basename, to_raw_github, GithubFetcher, TemplateSource,
};
use ptl_scraper::TemplateSchema;

#[derive(Parser)]
#[command(name = "generate_template_schema")]
#[command(about = "Extract per-template schema JSON from remote policy templates")]
struct Args {
    /// JSON array of template URLs (strings or {"url": ...} objects)
    #[arg(long, default_value = "lists/template_list.json")]
    list: PathBuf,

    /// Output directory for per-template schema JSON
    #[arg(long, default_value = "generated_data/template_schema")]
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let urls = load_template_list(&args.list)
        .with_context(|| format!("loading template list {}", args.list.display()))?;
    let fetcher = GithubFetcher::new()?;

    for url in urls {
        let raw = to_raw_github(&url);
        let base = template_basename(&raw);

        let text = match fetcher.fetch_text(&raw).await {
            Ok(text) => text,
            Err(e) => {
                warn!(url = %raw, error = %e, "fetch failed, skipping template");
                continue;
            }
        };

        let mut schema = TemplateSchema::from_source(&text);
        for (i, incident) in schema.incidents.iter_mut().enumerate() {
            incident.path = Some(format!(
                "generated_data/fake_incident_tables/{}_{}.json",
                base,
                i + 1
            ));
        }
        schema.url = Some(raw.clone());
        schema.filename = Path::new(&url)
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string());

        let outfile = args.out_dir.join(format!("{base}.json"));
        fs::write(&outfile, serde_json::to_string_pretty(&schema)?)
            .with_context(|| format!("writing {}", outfile.display()))?;
        info!(path = %outfile.display(), "wrote schema");
    }

    Ok(())
}
