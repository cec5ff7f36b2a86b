pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use core::{
    engine::{AnalysisEngine, AnalysisOutcome},
    file_pipeline::FileAnalysisPipeline,
    pipeline::{RunReport, SentimentPipeline},
};
pub use domain::model::{Category, CountTable, DatasetResult, SentimentValue};
pub use utils::error::{AnalysisError, Result};
