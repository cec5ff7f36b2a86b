use anyhow::{bail, Context};
use clap::Parser;
use railway_sentiment::core::ontology::{OntologyDocument, SemanticModel};
use railway_sentiment::utils::logger;
use std::path::Path;

#[derive(Parser)]
#[command(name = "create-ontology")]
#[command(about = "Write the default railway sentiment ontology")]
struct Args {
    /// Where to write the ontology TOML
    #[arg(short, long, default_value = "railway-sentiment.toml")]
    output: String,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let path = Path::new(&args.output);
    if path.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let document = OntologyDocument::railway_default();
    // 寫出前先確認文件能被載入
    let model = SemanticModel::from_document(&document, args.output.as_str())
        .context("default ontology failed validation")?;

    document
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!(
        "🧬 Ontology written: {} classes, {} data properties",
        model.class_count(),
        model.property_count()
    );
    println!("✅ Ontology saved to: {}", path.display());

    Ok(())
}
