use clap::Parser;
use railway_sentiment::utils::{logger, validation::Validate};
use railway_sentiment::{
    AnalysisEngine, AnalysisError, CliConfig, DatasetResult, FileAnalysisPipeline, LocalStorage, SentimentPipeline,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting railway-sentiment CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 詞典在第一則訊息之前載入，失敗即結束
    let analyzer = match SentimentPipeline::from_config(&config) {
        Ok(analyzer) => analyzer,
        Err(e) => exit_with(e),
    };

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = FileAnalysisPipeline::new(storage, config, analyzer);
    let engine = AnalysisEngine::new(pipeline);

    match engine.run().await {
        Ok(outcome) => {
            tracing::info!("✅ Analysis completed successfully!");
            print_summary(&outcome.result);
            println!("📁 Output saved to: {}", outcome.output_path);
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn print_summary(result: &DatasetResult) {
    println!("✅ Dataset '{}' analyzed", result.dataset);
    for (category, counts) in result.analysis.iter() {
        println!(
            "  {:<16} 👍 {:>4}  😐 {:>4}  👎 {:>4}",
            category.display_name(),
            counts.positive,
            counts.neutral,
            counts.negative
        );
    }
}

fn exit_with(e: AnalysisError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Analysis failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code())
}
