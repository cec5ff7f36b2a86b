//! Lexicon-based compound sentiment scoring.
//!
//! By default the pretrained VADER model (full lexicon) from the
//! `vader_sentiment` crate produces the compound score. A user-supplied
//! lexicon is scored with the same VADER rules implemented here: per-token
//! valences, booster words, capitalization emphasis, negation within a
//! three-token window, "but" contrast weighting and punctuation emphasis,
//! normalized into a compound score in `[-1, 1]`.

use crate::domain::model::SentimentValue;
use crate::utils::error::{AnalysisError, ResourceKind, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use vader_sentiment::SentimentIntensityAnalyzer;

const B_INCR: f64 = 0.293;
const B_DECR: f64 = -0.293;
const C_INCR: f64 = 0.733;
const N_SCALAR: f64 = -0.74;
const NORMALIZE_ALPHA: f64 = 15.0;

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "ain't",
    "aren't", "can't", "couldn't", "daren't", "didn't", "doesn't", "dont", "hadnt", "hasnt",
    "havent", "isnt", "mightnt", "mustnt", "neither", "don't", "hadn't", "hasn't", "haven't",
    "isn't", "mightn't", "mustn't", "neednt", "needn't", "never", "none", "nope", "nor", "not",
    "nothing", "nowhere", "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent", "oughtn't",
    "shan't", "shouldn't", "uh-uh", "wasn't", "weren't", "without", "wont", "wouldnt", "won't",
    "wouldn't", "rarely", "seldom", "despite",
];

const BOOSTERS_UP: &[&str] = &[
    "absolutely", "amazingly", "awfully", "completely", "considerably", "decidedly", "deeply",
    "enormously", "entirely", "especially", "exceptionally", "extremely", "fabulously",
    "fully", "greatly", "hella", "highly", "hugely", "incredibly", "intensely", "majorly",
    "more", "most", "particularly", "purely", "quite", "really", "remarkably", "so",
    "substantially", "thoroughly", "totally", "tremendously", "uber", "unbelievably",
    "unusually", "utterly", "very",
];

const BOOSTERS_DOWN: &[&str] = &[
    "almost", "barely", "hardly", "kinda", "kindof", "kind-of", "less", "little", "marginally",
    "occasionally", "partly", "scarcely", "slightly", "somewhat", "sorta", "sortof", "sort-of",
];

/// VADER 格式的詞典：每行 `token<TAB>mean[<TAB>...]`
#[derive(Debug, Clone)]
pub struct SentimentLexicon {
    valences: HashMap<String, f64>,
}

impl SentimentLexicon {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let resolved = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let content = std::fs::read_to_string(path).map_err(|_| AnalysisError::ResourceMissing {
            resource: ResourceKind::Lexicon,
            path: resolved.display().to_string(),
        })?;
        Self::parse(&content, &resolved.display().to_string())
    }

    pub fn parse(content: &str, origin: &str) -> Result<Self> {
        let mut valences = HashMap::new();

        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split('\t');
            let token = fields.next().unwrap_or_default();
            let valence = fields
                .next()
                .and_then(|v| v.trim().parse::<f64>().ok())
                .ok_or_else(|| AnalysisError::MalformedResource {
                    resource: ResourceKind::Lexicon,
                    path: origin.to_string(),
                    reason: format!("line {}: expected '<token>\\t<valence>'", line_no + 1),
                })?;
            valences.insert(token.to_string(), valence);
        }

        if valences.is_empty() {
            return Err(AnalysisError::MalformedResource {
                resource: ResourceKind::Lexicon,
                path: origin.to_string(),
                reason: "lexicon contains no entries".to_string(),
            });
        }

        Ok(Self { valences })
    }

    pub fn valence(&self, token: &str) -> Option<f64> {
        self.valences.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.valences.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

enum Backend {
    Pretrained(SentimentIntensityAnalyzer<'static>),
    Custom(SentimentLexicon),
}

/// 程序啟動時建立一次，之後唯讀共用
pub struct SentimentScorer {
    backend: Backend,
}

impl fmt::Debug for SentimentScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.backend {
            Backend::Pretrained(_) => f.write_str("SentimentScorer(pretrained VADER)"),
            Backend::Custom(lexicon) => write!(f, "SentimentScorer(custom, {} entries)", lexicon.len()),
        }
    }
}

impl SentimentScorer {
    /// 使用 NLTK 同款的完整 VADER 詞典
    pub fn pretrained() -> Self {
        Self {
            backend: Backend::Pretrained(SentimentIntensityAnalyzer::new()),
        }
    }

    pub fn new(lexicon: SentimentLexicon) -> Self {
        Self {
            backend: Backend::Custom(lexicon),
        }
    }

    /// 依設定載入詞典；未指定路徑時使用預訓練 VADER
    pub fn load(lexicon_path: Option<&str>) -> Result<Self> {
        match lexicon_path {
            Some(path) => {
                let lexicon = SentimentLexicon::from_file(path)?;
                tracing::debug!("Sentiment lexicon loaded with {} entries", lexicon.len());
                Ok(Self::new(lexicon))
            }
            None => {
                tracing::debug!("Using pretrained VADER lexicon");
                Ok(Self::pretrained())
            }
        }
    }

    /// 自訂詞典；預訓練模型時為 `None`
    pub fn lexicon(&self) -> Option<&SentimentLexicon> {
        match &self.backend {
            Backend::Pretrained(_) => None,
            Backend::Custom(lexicon) => Some(lexicon),
        }
    }

    pub fn score(&self, text: &str) -> SentimentValue {
        SentimentValue::from_compound(self.compound(text))
    }

    pub fn compound(&self, text: &str) -> f64 {
        match &self.backend {
            Backend::Pretrained(analyzer) => {
                if text.trim().is_empty() {
                    return 0.0;
                }
                analyzer
                    .polarity_scores(text)
                    .get("compound")
                    .copied()
                    .unwrap_or(0.0)
            }
            Backend::Custom(lexicon) => lexicon_compound(lexicon, text),
        }
    }
}

fn lexicon_compound(lexicon: &SentimentLexicon, text: &str) -> f64 {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return 0.0;
    }

    let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
    let cap_diff = is_cap_differential(&tokens);

    let mut sentiments = Vec::with_capacity(tokens.len());
    for i in 0..tokens.len() {
        if booster_scalar(&lowered[i]).is_some() {
            sentiments.push(0.0);
            continue;
        }
        if lowered[i] == "kind" && lowered.get(i + 1).is_some_and(|next| next == "of") {
            sentiments.push(0.0);
            continue;
        }
        sentiments.push(valence_at(lexicon, &tokens, &lowered, i, cap_diff));
    }

    apply_but_contrast(&lowered, &mut sentiments);

    let mut sum: f64 = sentiments.iter().sum();
    let emphasis = punctuation_emphasis(text);
    if sum > 0.0 {
        sum += emphasis;
    } else if sum < 0.0 {
        sum -= emphasis;
    }

    normalize(sum)
}

fn valence_at(lexicon: &SentimentLexicon, tokens: &[String], lowered: &[String], i: usize, cap_diff: bool) -> f64 {
    let Some(base) = lexicon.valence(&lowered[i]) else {
        return 0.0;
    };
    let mut valence = base;

    // "no" 後接情緒詞時本身不計分，改為否定後面的詞
    if lowered[i] == "no" && lowered.get(i + 1).is_some_and(|next| lexicon.contains(next)) {
        valence = 0.0;
    }
    if (i > 0 && lowered[i - 1] == "no")
        || (i > 1 && lowered[i - 2] == "no")
        || (i > 2 && lowered[i - 3] == "no" && matches!(lowered[i - 1].as_str(), "or" | "nor"))
    {
        valence = base * N_SCALAR;
    }

    if cap_diff && is_all_caps(&tokens[i]) {
        valence += if valence > 0.0 { C_INCR } else { -C_INCR };
    }

    for start in 0..3 {
        if i > start && !lexicon.contains(&lowered[i - start - 1]) {
            let mut scalar = scalar_inc_dec(&tokens[i - start - 1], &lowered[i - start - 1], valence, cap_diff);
            if start == 1 {
                scalar *= 0.95;
            } else if start == 2 {
                scalar *= 0.9;
            }
            valence += scalar;
            valence = negation_check(valence, lowered, start, i);
        }
    }

    least_check(lexicon, valence, lowered, i)
}

fn least_check(lexicon: &SentimentLexicon, valence: f64, lowered: &[String], i: usize) -> f64 {
    if i > 1 && lowered[i - 1] == "least" && !lexicon.contains(&lowered[i - 1]) {
        if lowered[i - 2] != "at" && lowered[i - 2] != "very" {
            return valence * N_SCALAR;
        }
    } else if i > 0 && lowered[i - 1] == "least" && !lexicon.contains(&lowered[i - 1]) {
        return valence * N_SCALAR;
    }
    valence
}

/// 去掉字首尾標點（剩兩個字元以內則保留原樣），並丟棄單一字元的 token
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|token| {
            let stripped = token.trim_matches(|c: char| c.is_ascii_punctuation());
            if stripped.chars().count() <= 2 {
                token.to_string()
            } else {
                stripped.to_string()
            }
        })
        .filter(|token| token.chars().count() > 1)
        .collect()
}

fn is_all_caps(token: &str) -> bool {
    let mut cased = false;
    for c in token.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// 部分（但不是全部）token 為全大寫
fn is_cap_differential(tokens: &[String]) -> bool {
    let caps = tokens.iter().filter(|t| is_all_caps(t)).count();
    caps > 0 && caps < tokens.len()
}

fn booster_scalar(lowered: &str) -> Option<f64> {
    if BOOSTERS_UP.contains(&lowered) {
        Some(B_INCR)
    } else if BOOSTERS_DOWN.contains(&lowered) {
        Some(B_DECR)
    } else {
        None
    }
}

fn scalar_inc_dec(token: &str, lowered: &str, valence: f64, cap_diff: bool) -> f64 {
    let Some(mut scalar) = booster_scalar(lowered) else {
        return 0.0;
    };
    if valence < 0.0 {
        scalar = -scalar;
    }
    if cap_diff && is_all_caps(token) {
        scalar += if valence > 0.0 { C_INCR } else { -C_INCR };
    }
    scalar
}

fn is_negated(lowered: &str) -> bool {
    NEGATIONS.contains(&lowered) || lowered.contains("n't")
}

fn negation_check(valence: f64, lowered: &[String], start: usize, i: usize) -> f64 {
    let is_so_or_this = |w: &str| w == "so" || w == "this";
    match start {
        0 => {
            if is_negated(&lowered[i - 1]) {
                valence * N_SCALAR
            } else {
                valence
            }
        }
        1 => {
            if lowered[i - 2] == "never" && is_so_or_this(&lowered[i - 1]) {
                valence * 1.25
            } else if lowered[i - 2] == "without" && lowered[i - 1] == "doubt" {
                valence
            } else if is_negated(&lowered[i - 2]) {
                valence * N_SCALAR
            } else {
                valence
            }
        }
        _ => {
            if lowered[i - 3] == "never"
                && (is_so_or_this(&lowered[i - 2]) || is_so_or_this(&lowered[i - 1]))
            {
                valence * 1.25
            } else if lowered[i - 3] == "without"
                && (lowered[i - 2] == "doubt" || lowered[i - 1] == "doubt")
            {
                valence
            } else if is_negated(&lowered[i - 3]) {
                valence * N_SCALAR
            } else {
                valence
            }
        }
    }
}

/// "but" 之前的情緒減半，之後的加權 1.5 倍
fn apply_but_contrast(lowered: &[String], sentiments: &mut [f64]) {
    let Some(pivot) = lowered.iter().position(|w| w == "but") else {
        return;
    };
    for (index, sentiment) in sentiments.iter_mut().enumerate() {
        if index < pivot {
            *sentiment *= 0.5;
        } else if index > pivot {
            *sentiment *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(4) as f64 * 0.292;
    let questions = text.matches('?').count();
    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * 0.18,
        _ => 0.96,
    };
    exclamations + question_emphasis
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + NORMALIZE_ALPHA).sqrt()).clamp(-1.0, 1.0)
}
