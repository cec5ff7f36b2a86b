use crate::utils::error::{AnalysisError, Result};
use crate::utils::validation::validate_file_extension;
use std::path::Path;

pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["txt", "csv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Text,
    Csv,
}

impl InputFormat {
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        validate_file_extension("input", file_name, &SUPPORTED_EXTENSIONS).map_err(|e| {
            AnalysisError::ValidationError {
                message: format!("Only .txt and .csv files are supported ({})", e),
            }
        })?;

        let is_csv = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        Ok(if is_csv { InputFormat::Csv } else { InputFormat::Text })
    }
}

/// 將上傳檔案解碼成逐行文字；空白行保留，交由分析流程略過
pub fn decode_lines(file_name: &str, bytes: &[u8]) -> Result<Vec<String>> {
    let format = InputFormat::from_file_name(file_name)?;
    let content = std::str::from_utf8(bytes).map_err(|e| AnalysisError::DecodeFailure {
        input: file_name.to_string(),
        reason: e.to_string(),
    })?;

    match format {
        InputFormat::Text => Ok(content
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect()),
        InputFormat::Csv => first_column(content),
    }
}

fn first_column(content: &str) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut lines = Vec::new();
    for record in reader.records() {
        let record = record?;
        // 整列空白時沒有任何欄位
        if let Some(first) = record.get(0) {
            lines.push(first.to_string());
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_keeps_blank_lines_and_strips_cr() {
        let lines = decode_lines("tweets.txt", b"first\r\n\r\nthird\n").unwrap();
        assert_eq!(lines, vec!["first", "", "third", ""]);
    }

    #[test]
    fn test_csv_takes_first_column() {
        let data = b"\"Dirty washroom, again\",2024-01-01\nStaff was polite,2024-01-02,extra\n\nlate\n";
        let lines = decode_lines("tweets.csv", data).unwrap();
        assert_eq!(lines, vec!["Dirty washroom, again", "Staff was polite", "late"]);
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let err = decode_lines("tweets.json", b"[]").unwrap_err();
        assert!(matches!(err, AnalysisError::ValidationError { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_decode_failure() {
        let err = decode_lines("tweets.txt", &[0x66, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, AnalysisError::DecodeFailure { .. }));
    }

    #[test]
    fn test_format_detection_is_case_insensitive() {
        assert_eq!(InputFormat::from_file_name("A.CSV").unwrap(), InputFormat::Csv);
        assert_eq!(InputFormat::from_file_name("a.txt").unwrap(), InputFormat::Text);
    }
}
