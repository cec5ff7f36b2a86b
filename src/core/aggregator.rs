use crate::domain::model::{Category, CountTable, SentimentValue};

/// 每則未略過的訊息呼叫一次
pub fn accumulate(results: &mut CountTable, category: Category, value: SentimentValue) {
    results.get_mut(category).increment(value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_increments_single_bucket() {
        let mut table = CountTable::new();
        accumulate(&mut table, Category::Security, SentimentValue::Negative);
        accumulate(&mut table, Category::Security, SentimentValue::Negative);
        accumulate(&mut table, Category::Security, SentimentValue::Neutral);

        let security = table.get(Category::Security);
        assert_eq!(security.negative, 2);
        assert_eq!(security.neutral, 1);
        assert_eq!(security.positive, 0);
        assert_eq!(security.total(), 3);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn test_other_categories_untouched() {
        let mut table = CountTable::new();
        accumulate(&mut table, Category::StaffBehaviour, SentimentValue::Positive);

        for (category, counts) in table.iter() {
            if category == Category::StaffBehaviour {
                assert_eq!(counts.positive, 1);
            } else {
                assert_eq!(counts.total(), 0);
            }
        }
    }
}
