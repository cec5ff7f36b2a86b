use crate::domain::model::Category;

/// 依優先順序排列，第一個命中的分類勝出
const KEYWORD_RULES: [(Category, &[&str]); 4] = [
    (Category::Cleanliness, &["clean", "dirty", "washroom", "garbage"]),
    (Category::StaffBehaviour, &["staff", "tc", "tt", "rude", "polite"]),
    (Category::Punctuality, &["late", "delay", "time", "punctual"]),
    (Category::Security, &["police", "rpf", "steal", "theft", "safe"]),
];

const DEFAULT_CATEGORY: Category = Category::Timeliness;

/// 以子字串比對關鍵字，沒有命中時歸入 Timeliness
pub fn categorize(text: &str) -> Category {
    let lowered = text.to_lowercase();

    KEYWORD_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_category_keyword() {
        assert_eq!(categorize("The washroom was very dirty"), Category::Cleanliness);
        assert_eq!(categorize("Garbage everywhere"), Category::Cleanliness);
        assert_eq!(categorize("Staff was extremely polite and helpful"), Category::StaffBehaviour);
        assert_eq!(categorize("The TC was RUDE"), Category::StaffBehaviour);
        assert_eq!(categorize("Train arrived on time, no delay"), Category::Punctuality);
        assert_eq!(categorize("Running late again"), Category::Punctuality);
        assert_eq!(categorize("RPF caught a thief quickly"), Category::Security);
        assert_eq!(categorize("Police patrol at night"), Category::Security);
    }

    #[test]
    fn test_default_is_timeliness() {
        assert_eq!(categorize(""), Category::Timeliness);
        assert_eq!(categorize("Good journey overall"), Category::Timeliness);
        assert_eq!(categorize("1234 !!!"), Category::Timeliness);
    }

    #[test]
    fn test_first_match_wins_on_overlap() {
        // staff 與 late 同時出現時以 StaffBehaviour 為準
        assert_eq!(categorize("Staff came late"), Category::StaffBehaviour);
        assert_eq!(categorize("Dirty coach and police absent"), Category::Cleanliness);
        assert_eq!(categorize("Delayed, but felt safe"), Category::Punctuality);
    }

    #[test]
    fn test_substring_matching_inside_words() {
        // "unsafe" 含 safe，"bottle" 含 tt
        assert_eq!(categorize("Felt unsafe"), Category::Security);
        assert_eq!(categorize("Water bottle was expensive"), Category::StaffBehaviour);
        assert_eq!(categorize("sometimes"), Category::Punctuality);
    }

    #[test]
    fn test_deterministic() {
        let text = "Washroom staff were late";
        let first = categorize(text);
        for _ in 0..10 {
            assert_eq!(categorize(text), first);
        }
    }
}
