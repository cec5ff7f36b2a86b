use crate::core::{DatasetResult, Pipeline};
use crate::utils::error::Result;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub output_path: String,
    pub result: DatasetResult,
}

pub struct AnalysisEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> AnalysisEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<AnalysisOutcome> {
        let started = Instant::now();
        tracing::info!("Starting sentiment analysis...");

        // Extract
        let dataset = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} lines for dataset '{}'", dataset.lines.len(), dataset.name);

        // Transform
        let result = self.pipeline.transform(dataset).await?;
        tracing::info!("🧮 Classified {} messages", result.analysis.total());

        // Load
        let output_path = self.pipeline.load(&result).await?;
        tracing::info!("💾 Output saved to: {} ({:?})", output_path, started.elapsed());

        Ok(AnalysisOutcome { output_path, result })
    }
}
