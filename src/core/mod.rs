pub mod aggregator;
pub mod categorizer;
pub mod engine;
pub mod file_pipeline;
pub mod input;
pub mod ontology;
pub mod overlay;
pub mod pipeline;
pub mod reasoner;
pub mod sentiment;

pub use crate::domain::model::{Category, CountTable, Dataset, DatasetResult, SentimentCounts, SentimentValue};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Reasoner, ReasonerKind, ReasoningReport, Storage};
pub use crate::utils::error::Result;
