use crate::core::input::decode_lines;
use crate::core::pipeline::SentimentPipeline;
use crate::core::{ConfigProvider, Dataset, DatasetResult, Pipeline, Storage};
use crate::utils::error::{AnalysisError, Result};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 讀取 .txt/.csv、執行分析並把結果寫成 JSON
pub struct FileAnalysisPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    analyzer: SentimentPipeline,
}

impl<S: Storage, C: ConfigProvider> FileAnalysisPipeline<S, C> {
    pub fn new(storage: S, config: C, analyzer: SentimentPipeline) -> Self {
        Self {
            storage,
            config,
            analyzer,
        }
    }

    pub fn analyzer(&self) -> &SentimentPipeline {
        &self.analyzer
    }
}

/// 等待端被丟棄（逾時或取消）時通知背景分析停止
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for FileAnalysisPipeline<S, C> {
    async fn extract(&self) -> Result<Dataset> {
        let input_path = self.config.input_path();
        tracing::debug!("Reading input file: {}", input_path);

        let bytes = tokio::fs::read(input_path).await?;
        let file_name = Path::new(input_path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(input_path);
        let lines = decode_lines(file_name, &bytes)?;

        tracing::debug!("Decoded {} lines from {}", lines.len(), file_name);

        Ok(Dataset {
            name: self.config.dataset_name().to_string(),
            lines,
        })
    }

    async fn transform(&self, dataset: Dataset) -> Result<DatasetResult> {
        let cancel = Arc::new(AtomicBool::new(false));
        let guard = CancelOnDrop(Arc::clone(&cancel));
        let flag = Arc::clone(&cancel);
        let analyzer = self.analyzer.clone();

        // 推論是同步的整體運算，交給 blocking pool
        let mut task = tokio::task::spawn_blocking(move || {
            analyzer
                .analyze_with_cancel(&dataset.name, &dataset.lines, &flag)
                .map(|report| report.result)
        });

        let joined = match self.config.run_timeout() {
            Some(limit) => match tokio::time::timeout(limit, &mut task).await {
                Ok(joined) => joined,
                Err(_) => {
                    tracing::warn!("⏱️ Analysis exceeded {:?}, cancelling", limit);
                    cancel.store(true, Ordering::Relaxed);
                    // 等分析在下一則訊息前停下並釋放模型後才返回
                    task.await
                }
            },
            None => task.await,
        };
        drop(guard);

        joined.map_err(|e| AnalysisError::ProcessingError {
            message: format!("analysis task failed: {}", e),
        })?
    }

    async fn load(&self, result: &DatasetResult) -> Result<String> {
        let output_path = Path::new(self.config.output_path())
            .join(self.config.output_file())
            .display()
            .to_string();

        let json = serde_json::to_vec_pretty(result)?;
        tracing::debug!("Writing analysis ({} bytes) to storage", json.len());
        self.storage.write_file(self.config.output_file(), &json).await?;

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::LocalStorage;
    use crate::core::ontology::{OntologyDocument, OntologySource, SemanticModel};
    use crate::core::sentiment::SentimentScorer;
    use crate::core::{Reasoner, ReasonerKind, ReasoningReport};
    use std::time::Duration;
    use tempfile::TempDir;

    /// 每次推論都要花一段時間
    struct SlowReasoner(Duration);

    impl Reasoner for SlowReasoner {
        fn name(&self) -> &str {
            "slow"
        }

        fn reason(&self, _model: &mut SemanticModel) -> Result<ReasoningReport> {
            std::thread::sleep(self.0);
            Ok(ReasoningReport::default())
        }
    }

    struct TestConfig {
        dir: String,
        timeout: Option<Duration>,
    }

    impl ConfigProvider for TestConfig {
        fn dataset_name(&self) -> &str {
            "slow"
        }

        fn input_path(&self) -> &str {
            "unused.txt"
        }

        fn ontology_path(&self) -> &str {
            "railway-sentiment.toml"
        }

        fn lexicon_path(&self) -> Option<&str> {
            None
        }

        fn reasoner(&self) -> ReasonerKind {
            ReasonerKind::Rules
        }

        fn output_path(&self) -> &str {
            &self.dir
        }

        fn output_file(&self) -> &str {
            "analysis.json"
        }

        fn run_timeout(&self) -> Option<Duration> {
            self.timeout
        }
    }

    fn slow_pipeline(dir: &TempDir, timeout: Option<Duration>) -> FileAnalysisPipeline<LocalStorage, TestConfig> {
        let ontology = dir.path().join("railway-sentiment.toml");
        OntologyDocument::railway_default().save(&ontology).unwrap();
        let analyzer = SentimentPipeline::new(
            Arc::new(SentimentScorer::pretrained()),
            OntologySource::new(ontology),
            Arc::new(SlowReasoner(Duration::from_millis(200))),
        );
        let output = dir.path().display().to_string();
        FileAnalysisPipeline::new(
            LocalStorage::new(output.clone()),
            TestConfig { dir: output, timeout },
            analyzer,
        )
    }

    fn dataset() -> Dataset {
        Dataset {
            name: "slow".to_string(),
            lines: (0..10).map(|i| format!("Coach {} was dirty", i)).collect(),
        }
    }

    #[tokio::test]
    async fn test_timeout_releases_model_before_returning() {
        let dir = TempDir::new().unwrap();
        let pipeline = slow_pipeline(&dir, Some(Duration::from_millis(50)));

        let err = pipeline.transform(dataset()).await.unwrap_err();

        match err {
            AnalysisError::Cancelled { processed } => assert!(processed < 10),
            other => panic!("expected Cancelled, got {:?}", other),
        }
        assert_eq!(pipeline.analyzer().ontology().live_sessions(), 0);
    }

    #[tokio::test]
    async fn test_dropped_transform_cancels_background_run() {
        let dir = TempDir::new().unwrap();
        let pipeline = slow_pipeline(&dir, None);

        let outer = tokio::time::timeout(Duration::from_millis(50), pipeline.transform(dataset())).await;
        assert!(outer.is_err());

        // 背景工作在下一則訊息前看到旗標
        let mut waited = Duration::ZERO;
        while pipeline.analyzer().ontology().live_sessions() > 0 && waited < Duration::from_secs(2) {
            tokio::time::sleep(Duration::from_millis(20)).await;
            waited += Duration::from_millis(20);
        }
        assert_eq!(pipeline.analyzer().ontology().live_sessions(), 0);
    }

    #[tokio::test]
    async fn test_load_writes_json_through_storage() {
        let dir = TempDir::new().unwrap();
        let pipeline = slow_pipeline(&dir, None);
        let result = DatasetResult {
            dataset: "slow".to_string(),
            analysis: crate::core::CountTable::new(),
        };

        let output = pipeline.load(&result).await.unwrap();

        assert!(output.ends_with("analysis.json"));
        let written = std::fs::read_to_string(dir.path().join("analysis.json")).unwrap();
        assert!(written.contains("\"dataset\": \"slow\""));
    }
}
