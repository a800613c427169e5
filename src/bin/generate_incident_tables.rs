//! Generate fake incident tables from per-template schema files.
//!
//! Reads every schema JSON in the input directory and writes one table per
//! incident: 50 rows of random data, one column per exported field.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use ptl_scraper::generate::tables::fake_rows;
use ptl_scraper::TemplateSchema;

#[derive(Parser)]
#[command(name = "generate_incident_tables")]
#[command(about = "Generate fake incident tables from extracted template schemas")]
struct Args {
    /// Directory of per-template schema JSON files
    #[arg(long, default_value = "generated_data/template_schema")]
    in_dir: PathBuf,

    /// Output directory for fake incident tables
    #[arg(long, default_value = "generated_data/fake_incident_tables")]
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
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    for path in schema_files(&args.in_dir)? {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let schema: TemplateSchema = match serde_json::from_str(&raw) {
            Ok(schema) => schema,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unparsable schema");
                continue;
            }
        };

        let cloud = schema.cloud.as_deref().unwrap_or("");
        let base = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        for (i, incident) in schema.incidents.iter().enumerate() {
            let rows = fake_rows(cloud, incident);
            let outfile = args.out_dir.join(format!("{}_{}.json", base, i + 1));
            fs::write(&outfile, serde_json::to_string_pretty(&rows)?)
                .with_context(|| format!("writing {}", outfile.display()))?;
            info!(path = %outfile.display(), rows = rows.len(), "wrote incident table");
        }
    }

    Ok(())
}

/// Schema JSON files in the input directory, sorted for stable output order.
fn schema_files(dir: &PathBuf) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}
