use clap::Parser;
use railway_sentiment::core::ConfigProvider;
use railway_sentiment::utils::{logger, validation::Validate};
use railway_sentiment::{AnalysisEngine, FileAnalysisPipeline, LocalStorage, SentimentPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-analyze")]
#[command(about = "Railway feedback sentiment analysis driven by a TOML configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "railway-analysis.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the dataset name from config
    #[arg(long)]
    dataset_name: Option<String>,

    /// Dry run - load ontology and lexicon without analyzing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    let verbose = args.verbose || config.verbose();
    if config.json_logs() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("🚀 Starting TOML-based sentiment analysis");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(name) = args.dataset_name.clone() {
        tracing::info!("🔧 Dataset name overridden to: {}", name);
        config.dataset.name = name;
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    let analyzer = match SentimentPipeline::from_config(&config) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(e.severity().exit_code());
        }
    };

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No messages will be analyzed");
        if let Err(e) = perform_dry_run(&analyzer) {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(e.severity().exit_code());
        }
        return Ok(());
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = FileAnalysisPipeline::new(storage, config, analyzer);
    let engine = AnalysisEngine::new(pipeline);

    match engine.run().await {
        Ok(outcome) => {
            tracing::info!("✅ Analysis completed successfully!");
            println!("✅ Dataset '{}' analyzed ({} messages)", outcome.result.dataset, outcome.result.analysis.total());
            println!("📁 Output saved to: {}", outcome.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Analysis failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            std::process::exit(e.severity().exit_code());
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Dataset: {}", config.dataset_name());
    println!("  Input: {}", config.input_path());
    println!("  Ontology: {}", config.ontology_path());
    println!("  Reasoner: {:?}", config.reasoner());
    println!("  Lexicon: {}", config.lexicon_path().unwrap_or("(pretrained VADER)"));
    println!("  Output: {}/{}", config.output_path(), config.output_file());

    if let Some(timeout) = config.run_timeout() {
        println!("  Timeout: {:?}", timeout);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }
}

fn perform_dry_run(analyzer: &SentimentPipeline) -> railway_sentiment::Result<()> {
    let session = analyzer.ontology().open()?;
    let model = session.model();

    println!("🔍 Dry run results:");
    match analyzer.scorer().lexicon() {
        Some(lexicon) => println!("  Lexicon entries: {}", lexicon.len()),
        None => println!("  Lexicon: pretrained VADER"),
    }
    println!("  Ontology: {} ({})", model.iri(), model.source());
    println!("  Classes: {}", model.class_count());
    println!("  Data properties: {}", model.property_count());
    println!("  Rules: {}", model.rules().len());

    Ok(())
}
