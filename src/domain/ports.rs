use crate::core::ontology::SemanticModel;
use crate::domain::model::{Dataset, DatasetResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 分析結果的輸出端；輸入檔直接依設定路徑讀取
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ReasonerKind {
    /// 依本體論規則前向推論
    #[default]
    Rules,
    /// 不推論，一律沿用原始分數
    None,
}

pub trait ConfigProvider: Send + Sync {
    fn dataset_name(&self) -> &str;
    fn input_path(&self) -> &str;
    fn ontology_path(&self) -> &str;
    fn lexicon_path(&self) -> Option<&str>;
    fn reasoner(&self) -> ReasonerKind;
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
    fn run_timeout(&self) -> Option<Duration>;
}

/// 對整個語意模型做一次完整推論
pub trait Reasoner: Send + Sync {
    fn name(&self) -> &str;
    fn reason(&self, model: &mut SemanticModel) -> Result<ReasoningReport>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReasoningReport {
    pub passes: usize,
    pub individuals_visited: usize,
    pub facts_inferred: usize,
}

impl ReasoningReport {
    pub fn absorb(&mut self, other: ReasoningReport) {
        self.passes += other.passes;
        self.individuals_visited += other.individuals_visited;
        self.facts_inferred += other.facts_inferred;
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Dataset>;
    async fn transform(&self, dataset: Dataset) -> Result<DatasetResult>;
    async fn load(&self, result: &DatasetResult) -> Result<String>;
}
