pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use self::cli_args::CliConfig;

#[cfg(feature = "cli")]
mod cli_args {
    use crate::core::{ConfigProvider, ReasonerKind};
    use crate::core::input::SUPPORTED_EXTENSIONS;
    use crate::utils::error::Result;
    use crate::utils::validation::{
        validate_file_extension, validate_non_empty_string, validate_path, validate_positive_number, Validate,
    };
    use clap::Parser;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "railway-sentiment")]
    #[command(about = "Classify rider feedback and count sentiment per service category")]
    pub struct CliConfig {
        #[arg(long, help = "Dataset name echoed back in the result")]
        pub dataset_name: String,

        #[arg(long, help = "Input .txt (one message per line) or .csv (first column)")]
        pub input: String,

        #[arg(long, default_value = "railway-sentiment.toml")]
        pub ontology: String,

        #[arg(long, help = "VADER-format lexicon file (pretrained VADER when omitted)")]
        pub lexicon: Option<String>,

        #[arg(long, value_enum, default_value_t = ReasonerKind::Rules)]
        pub reasoner: ReasonerKind,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        #[arg(long, default_value = "analysis.json")]
        pub output_file: String,

        #[arg(long, help = "Abort the analysis after this many seconds")]
        pub timeout_seconds: Option<u64>,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,
    }

    impl ConfigProvider for CliConfig {
        fn dataset_name(&self) -> &str {
            &self.dataset_name
        }

        fn input_path(&self) -> &str {
            &self.input
        }

        fn ontology_path(&self) -> &str {
            &self.ontology
        }

        fn lexicon_path(&self) -> Option<&str> {
            self.lexicon.as_deref()
        }

        fn reasoner(&self) -> ReasonerKind {
            self.reasoner
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_file(&self) -> &str {
            &self.output_file
        }

        fn run_timeout(&self) -> Option<Duration> {
            self.timeout_seconds.map(Duration::from_secs)
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_non_empty_string("dataset_name", &self.dataset_name)?;
            validate_file_extension("input", &self.input, &SUPPORTED_EXTENSIONS)?;
            validate_path("ontology", &self.ontology)?;
            if let Some(lexicon) = &self.lexicon {
                validate_path("lexicon", lexicon)?;
            }
            validate_path("output_path", &self.output_path)?;
            validate_path("output_file", &self.output_file)?;
            if let Some(timeout) = self.timeout_seconds {
                validate_positive_number("timeout_seconds", timeout, 1)?;
            }
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_defaults() {
            let config = CliConfig::parse_from([
                "railway-sentiment",
                "--dataset-name",
                "D1",
                "--input",
                "tweets.csv",
            ]);
            assert_eq!(config.ontology, "railway-sentiment.toml");
            assert_eq!(config.reasoner, ReasonerKind::Rules);
            assert_eq!(config.output_file, "analysis.json");
            assert!(config.lexicon_path().is_none());
            assert!(config.run_timeout().is_none());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_parse_overrides_and_validation() {
            let config = CliConfig::parse_from([
                "railway-sentiment",
                "--dataset-name",
                "D1",
                "--input",
                "tweets.json",
                "--reasoner",
                "none",
                "--timeout-seconds",
                "0",
            ]);
            assert_eq!(config.reasoner(), ReasonerKind::None);
            assert!(config.validate().is_err());
        }
    }
}
