use crate::core::input::SUPPORTED_EXTENSIONS;
use crate::core::{ConfigProvider, ReasonerKind};
use crate::utils::error::{AnalysisError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_positive_number,
    validate_required_field, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_OUTPUT_FILE: &str = "analysis.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub dataset: DatasetConfig,
    pub ontology: OntologyConfig,
    pub lexicon: Option<LexiconConfig>,
    pub output: OutputConfig,
    pub run: Option<RunConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub name: String,
    pub input: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntologyConfig {
    pub path: String,
    #[serde(default)]
    pub reasoner: ReasonerKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub verbose: Option<bool>,
    pub log_format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AnalysisError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AnalysisError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AnalysisError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("dataset.name", &self.dataset.name)?;

        let input = validate_required_field("dataset.input", &self.dataset.input)?;
        validate_file_extension("dataset.input", input, &SUPPORTED_EXTENSIONS)?;

        validate_path("ontology.path", &self.ontology.path)?;
        if let Some(lexicon) = self.lexicon_path() {
            validate_path("lexicon.path", lexicon)?;
        }
        validate_path("output.path", &self.output.path)?;

        if let Some(timeout) = self.run.as_ref().and_then(|r| r.timeout_seconds) {
            validate_positive_number("run.timeout_seconds", timeout, 1)?;
        }

        if let Some(format) = self.monitoring.as_ref().and_then(|m| m.log_format.as_deref()) {
            let valid_formats = ["compact", "json"];
            if !valid_formats.contains(&format) {
                return Err(AnalysisError::InvalidConfigValueError {
                    field: "monitoring.log_format".to_string(),
                    value: format.to_string(),
                    reason: format!("Unsupported format. Valid formats: {}", valid_formats.join(", ")),
                });
            }
        }

        Ok(())
    }

    pub fn verbose(&self) -> bool {
        self.monitoring.as_ref().and_then(|m| m.verbose).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .is_some_and(|format| format == "json")
    }
}

impl ConfigProvider for TomlConfig {
    fn dataset_name(&self) -> &str {
        &self.dataset.name
    }

    fn input_path(&self) -> &str {
        self.dataset.input.as_deref().unwrap_or_default()
    }

    fn ontology_path(&self) -> &str {
        &self.ontology.path
    }

    fn lexicon_path(&self) -> Option<&str> {
        self.lexicon.as_ref().and_then(|l| l.path.as_deref())
    }

    fn reasoner(&self) -> ReasonerKind {
        self.ontology.reasoner
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_file(&self) -> &str {
        self.output.file.as_deref().unwrap_or(DEFAULT_OUTPUT_FILE)
    }

    fn run_timeout(&self) -> Option<Duration> {
        self.run
            .as_ref()
            .and_then(|r| r.timeout_seconds)
            .map(Duration::from_secs)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
