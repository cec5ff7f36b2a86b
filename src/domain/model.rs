use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// 五種服務品質分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Cleanliness,
    StaffBehaviour,
    Punctuality,
    Security,
    Timeliness,
}

impl Category {
    /// 輸出順序與 `analysis` 表格一致
    pub const ALL: [Category; 5] = [
        Category::Cleanliness,
        Category::StaffBehaviour,
        Category::Punctuality,
        Category::Security,
        Category::Timeliness,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Cleanliness => "Cleanliness",
            Category::StaffBehaviour => "Staff Behaviour",
            Category::Punctuality => "Punctuality",
            Category::Security => "Security",
            Category::Timeliness => "Timeliness",
        }
    }

    /// 本體論中對應的資料屬性名稱
    pub fn property_name(self) -> &'static str {
        match self {
            Category::Cleanliness => "hasCleanliness",
            Category::StaffBehaviour => "hasStaffBehaviour",
            Category::Punctuality => "hasPunctuality",
            Category::Security => "hasSecurity",
            Category::Timeliness => "hasTimeliness",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// 三值情緒極性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentValue {
    Negative,
    Neutral,
    Positive,
}

impl SentimentValue {
    /// compound 分數的中性區間邊界（不含）
    pub const THRESHOLD: f64 = 0.05;

    pub fn from_compound(score: f64) -> Self {
        if score > Self::THRESHOLD {
            SentimentValue::Positive
        } else if score < -Self::THRESHOLD {
            SentimentValue::Negative
        } else {
            SentimentValue::Neutral
        }
    }

    /// Reasoner 推論出的整數值：1 為正面、-1 為負面，其餘一律視為中性
    pub fn from_inferred(value: i64) -> Self {
        match value {
            1 => SentimentValue::Positive,
            -1 => SentimentValue::Negative,
            _ => SentimentValue::Neutral,
        }
    }

    pub fn as_i64(self) -> i64 {
        match self {
            SentimentValue::Negative => -1,
            SentimentValue::Neutral => 0,
            SentimentValue::Positive => 1,
        }
    }
}

impl fmt::Display for SentimentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentValue::Negative => write!(f, "Negative"),
            SentimentValue::Neutral => write!(f, "Neutral"),
            SentimentValue::Positive => write!(f, "Positive"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    #[serde(rename = "Positive")]
    pub positive: u64,
    #[serde(rename = "Neutral")]
    pub neutral: u64,
    #[serde(rename = "Negative")]
    pub negative: u64,
}

impl SentimentCounts {
    pub fn increment(&mut self, value: SentimentValue) {
        match value {
            SentimentValue::Positive => self.positive += 1,
            SentimentValue::Neutral => self.neutral += 1,
            SentimentValue::Negative => self.negative += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.positive + self.neutral + self.negative
    }
}

/// 每個分類一列的計數表，五個分類永遠都在
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountTable {
    rows: [SentimentCounts; 5],
}

impl CountTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: Category) -> &SentimentCounts {
        &self.rows[category.slot()]
    }

    pub fn get_mut(&mut self, category: Category) -> &mut SentimentCounts {
        &mut self.rows[category.slot()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &SentimentCounts)> {
        Category::ALL.iter().map(move |c| (*c, self.get(*c)))
    }

    pub fn total(&self) -> u64 {
        self.rows.iter().map(SentimentCounts::total).sum()
    }
}

impl Serialize for CountTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::ALL.len()))?;
        for (category, counts) in self.iter() {
            map.serialize_entry(category.display_name(), counts)?;
        }
        map.end()
    }
}

/// 單一資料集分析的對外結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetResult {
    pub dataset: String,
    pub analysis: CountTable,
}

/// 已解碼、尚未處理的資料集
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub lines: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strict() {
        assert_eq!(SentimentValue::from_compound(0.05), SentimentValue::Neutral);
        assert_eq!(SentimentValue::from_compound(-0.05), SentimentValue::Neutral);
        assert_eq!(SentimentValue::from_compound(0.0501), SentimentValue::Positive);
        assert_eq!(SentimentValue::from_compound(-0.0501), SentimentValue::Negative);
        assert_eq!(SentimentValue::from_compound(1.0), SentimentValue::Positive);
        assert_eq!(SentimentValue::from_compound(-1.0), SentimentValue::Negative);
    }

    #[test]
    fn test_inferred_values_outside_domain_are_neutral() {
        assert_eq!(SentimentValue::from_inferred(1), SentimentValue::Positive);
        assert_eq!(SentimentValue::from_inferred(-1), SentimentValue::Negative);
        assert_eq!(SentimentValue::from_inferred(0), SentimentValue::Neutral);
        assert_eq!(SentimentValue::from_inferred(7), SentimentValue::Neutral);
    }

    #[test]
    fn test_count_table_serializes_all_categories_in_order() {
        let mut table = CountTable::new();
        table.get_mut(Category::StaffBehaviour).increment(SentimentValue::Positive);

        let result = DatasetResult {
            dataset: "D1".to_string(),
            analysis: table,
        };
        let json = serde_json::to_string(&result).unwrap();

        assert_eq!(
            json,
            concat!(
                r#"{"dataset":"D1","analysis":{"#,
                r#""Cleanliness":{"Positive":0,"Neutral":0,"Negative":0},"#,
                r#""Staff Behaviour":{"Positive":1,"Neutral":0,"Negative":0},"#,
                r#""Punctuality":{"Positive":0,"Neutral":0,"Negative":0},"#,
                r#""Security":{"Positive":0,"Neutral":0,"Negative":0},"#,
                r#""Timeliness":{"Positive":0,"Neutral":0,"Negative":0}}}"#
            )
        );
    }

    #[test]
    fn test_property_names_follow_category() {
        assert_eq!(Category::StaffBehaviour.property_name(), "hasStaffBehaviour");
        assert_eq!(Category::Timeliness.property_name(), "hasTimeliness");
        assert_eq!(Category::StaffBehaviour.to_string(), "Staff Behaviour");
    }
}
