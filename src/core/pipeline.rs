use crate::core::aggregator::accumulate;
use crate::core::categorizer::categorize;
use crate::core::ontology::OntologySource;
use crate::core::overlay::SemanticOverlay;
use crate::core::reasoner::build_reasoner;
use crate::core::sentiment::SentimentScorer;
use crate::core::ConfigProvider;
use crate::domain::model::{Category, CountTable, DatasetResult, SentimentValue};
use crate::domain::ports::{Reasoner, ReasoningReport};
use crate::utils::error::{AnalysisError, Result};
use crate::utils::validation::validate_non_empty_string;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// 單則訊息的處理結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MessageOutcome {
    pub index: usize,
    pub category: Category,
    pub raw: SentimentValue,
    pub resolved: SentimentValue,
    pub inferred: bool,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub result: DatasetResult,
    pub messages: Vec<MessageOutcome>,
    pub skipped: usize,
    pub reasoning: ReasoningReport,
}

/// 分類、評分、語意覆寫與彙總的整條流程；每次 run 使用自己的語意模型
#[derive(Clone)]
pub struct SentimentPipeline {
    scorer: Arc<SentimentScorer>,
    ontology: OntologySource,
    reasoner: Arc<dyn Reasoner>,
}

impl SentimentPipeline {
    pub fn new(scorer: Arc<SentimentScorer>, ontology: OntologySource, reasoner: Arc<dyn Reasoner>) -> Self {
        Self {
            scorer,
            ontology,
            reasoner,
        }
    }

    /// 依設定建立流程；詞典載入失敗屬於啟動錯誤
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let scorer = SentimentScorer::load(config.lexicon_path())?;
        Ok(Self::new(
            Arc::new(scorer),
            OntologySource::new(config.ontology_path()),
            build_reasoner(config.reasoner()),
        ))
    }

    pub fn ontology(&self) -> &OntologySource {
        &self.ontology
    }

    pub fn scorer(&self) -> &SentimentScorer {
        &self.scorer
    }

    pub fn run(&self, dataset_name: &str, lines: &[String]) -> Result<DatasetResult> {
        self.analyze(dataset_name, lines).map(|report| report.result)
    }

    pub fn analyze(&self, dataset_name: &str, lines: &[String]) -> Result<RunReport> {
        self.analyze_with_cancel(dataset_name, lines, &AtomicBool::new(false))
    }

    /// 每則訊息處理前檢查 `cancel`；中途離開時 session 隨 drop 釋放
    pub fn analyze_with_cancel(
        &self,
        dataset_name: &str,
        lines: &[String],
        cancel: &AtomicBool,
    ) -> Result<RunReport> {
        validate_non_empty_string("dataset_name", dataset_name)?;

        let started = Instant::now();
        let mut table = CountTable::new();
        let mut messages = Vec::new();
        let mut skipped = 0;
        let mut reasoning = ReasoningReport::default();

        let mut session = self.ontology.open()?;
        let overlay = SemanticOverlay::new(self.reasoner.as_ref());

        tracing::info!(
            "🚀 Analyzing dataset '{}' ({} lines, reasoner: {})",
            dataset_name,
            lines.len(),
            self.reasoner.name()
        );

        for (index, line) in lines.iter().enumerate() {
            if cancel.load(Ordering::Relaxed) {
                tracing::warn!("⚠️ Run for '{}' cancelled at line {}", dataset_name, index);
                return Err(AnalysisError::Cancelled {
                    processed: messages.len(),
                });
            }

            if line.trim().is_empty() {
                skipped += 1;
                continue;
            }

            let raw = self.scorer.score(line);
            let category = categorize(line);
            let (resolution, report) = overlay.resolve(session.model_mut(), index, category, raw)?;
            reasoning.absorb(report);

            accumulate(&mut table, category, resolution.value());
            messages.push(MessageOutcome {
                index,
                category,
                raw,
                resolved: resolution.value(),
                inferred: resolution.is_inferred(),
            });
        }

        drop(session);

        tracing::info!(
            "✅ Dataset '{}' analyzed: {} messages, {} skipped, {} inferred in {:?}",
            dataset_name,
            messages.len(),
            skipped,
            messages.iter().filter(|m| m.inferred).count(),
            started.elapsed()
        );

        Ok(RunReport {
            result: DatasetResult {
                dataset: dataset_name.to_string(),
                analysis: table,
            },
            messages,
            skipped,
            reasoning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ontology::OntologyDocument;
    use crate::core::reasoner::{NoopReasoner, RuleReasoner};
    use tempfile::TempDir;

    fn pipeline_in(dir: &TempDir, reasoner: Arc<dyn Reasoner>) -> SentimentPipeline {
        let path = dir.path().join("railway-sentiment.toml");
        OntologyDocument::railway_default().save(&path).unwrap();
        let scorer = SentimentScorer::pretrained();
        SentimentPipeline::new(Arc::new(scorer), OntologySource::new(path), reasoner)
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_indices_are_not_renumbered_after_skips() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline_in(&dir, Arc::new(NoopReasoner));

        let report = pipeline
            .analyze("D1", &lines(&["", "dirty washroom", "   ", "rude staff"]))
            .unwrap();

        let indices: Vec<usize> = report.messages.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![1, 3]);
        assert_eq!(report.skipped, 2);
    }

    #[test]
    fn test_cancel_flag_stops_run_and_releases_model() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline_in(&dir, Arc::new(RuleReasoner::new()));
        let cancel = AtomicBool::new(true);

        let err = pipeline
            .analyze_with_cancel("D1", &lines(&["dirty washroom"]), &cancel)
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Cancelled { processed: 0 }));
        assert_eq!(pipeline.ontology().live_sessions(), 0);
    }

    #[test]
    fn test_blank_dataset_name_is_rejected() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline_in(&dir, Arc::new(NoopReasoner));
        assert!(pipeline.run("  ", &lines(&["dirty"])).is_err());
        assert_eq!(pipeline.ontology().live_sessions(), 0);
    }
}
