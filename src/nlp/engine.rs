use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());
static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// 英文停用词表
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "is", "at", "which", "on", "a", "an", "and", "or", "but", "in", "with", "to",
        "for", "of", "as", "by", "that", "this", "it", "from", "be", "are", "been", "was",
        "were", "will", "would", "can", "could", "should", "may", "might", "must", "shall",
        "do", "does", "did", "have", "has", "had", "having", "i", "you", "he", "she", "we",
        "they", "me", "him", "her", "us", "them", "my", "your", "his", "its", "our", "their",
    ]
    .into_iter()
    .collect()
});

/// 文本处理引擎
///
/// 无状态的预处理与关键词工具，供识别器和知识库共用。
#[derive(Debug, Clone, Copy, Default)]
pub struct TextEngine;

impl TextEngine {
    /// 清洗文本：转小写、去标点、折叠空白
    pub fn preprocess(text: &str) -> String {
        let lowered = text.to_lowercase();
        let stripped = NON_WORD.replace_all(lowered.trim(), " ");
        MULTI_SPACE.replace_all(&stripped, " ").trim().to_string()
    }

    /// 提取关键词：过滤停用词和过短词
    pub fn extract_keywords(text: &str) -> Vec<String> {
        Self::preprocess(text)
            .split_whitespace()
            .filter(|w| w.len() > 2 && !STOP_WORDS.contains(w))
            .map(str::to_string)
            .collect()
    }

    /// 关键词重叠相似度（Jaccard）
    pub fn similarity(text1: &str, text2: &str) -> f64 {
        let kw1: HashSet<String> = Self::extract_keywords(text1).into_iter().collect();
        let kw2: HashSet<String> = Self::extract_keywords(text2).into_iter().collect();

        if kw1.is_empty() || kw2.is_empty() {
            return 0.0;
        }

        let intersection = kw1.intersection(&kw2).count();
        let union = kw1.union(&kw2).count();
        intersection as f64 / union as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_strips_punctuation() {
        assert_eq!(TextEngine::preprocess("Hi there!!  How's it?"), "hi there how s it");
    }

    #[test]
    fn test_preprocess_empty() {
        assert_eq!(TextEngine::preprocess(""), "");
        assert_eq!(TextEngine::preprocess("   "), "");
    }

    #[test]
    fn test_keywords_filter_stop_words() {
        let keywords = TextEngine::extract_keywords("What is the best laptop for programming?");
        assert!(keywords.contains(&"best".to_string()));
        assert!(keywords.contains(&"laptop".to_string()));
        assert!(keywords.contains(&"programming".to_string()));
        assert!(!keywords.contains(&"the".to_string()));
        assert!(!keywords.contains(&"for".to_string()));
    }

    #[test]
    fn test_similarity() {
        let sim = TextEngine::similarity("best gaming laptop", "gaming laptop deals");
        assert!(sim > 0.0 && sim < 1.0);
        assert_eq!(TextEngine::similarity("laptop", ""), 0.0);
        assert_eq!(TextEngine::similarity("gaming laptop", "gaming laptop"), 1.0);
    }
}
