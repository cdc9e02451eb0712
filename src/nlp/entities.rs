//! 实体提取
//!
//! 与意图分类相互独立：无论哪个类别胜出，所有实体模式都会被评估，
//! 命中即写入意图的实体映射。提取结果保留原文大小写，价格区间会
//! 归一化为紧凑形式（"under $1000" -> "<1000"）。

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// 实体种类与对应的提取模式，顺序固定以保证结果可复现
static ENTITY_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        (
            "product_type",
            // 复数形式归一到单数词干（捕获组 1）
            Regex::new(r"(?i)\b(laptop|phone|tablet|computer|smartphone|iphone|android|pc|mac)s?\b")
                .unwrap(),
        ),
        (
            "price_range",
            Regex::new(
                r"(?i)\b(under\s*\$?\d+|above\s*\$?\d+|over\s*\$?\d+|\$?\d+\s*(?:-|to|and)\s*\$?\d+)\b",
            )
            .unwrap(),
        ),
        (
            "brand",
            Regex::new(r"(?i)\b(apple|samsung|dell|hp|lenovo|microsoft|sony|lg|google|oneplus|asus|xiaomi)\b")
                .unwrap(),
        ),
        (
            "sport",
            Regex::new(r"(?i)\b(football|soccer|basketball|tennis|cricket|baseball|golf|hockey)\b")
                .unwrap(),
        ),
        (
            "team",
            Regex::new(
                r"(?i)\b(real madrid|barcelona|manchester united|manchester city|liverpool|chelsea|arsenal|bayern munich|lakers|warriors|celtics)\b",
            )
            .unwrap(),
        ),
        (
            "player",
            Regex::new(r"(?i)\b(messi|ronaldo|haaland|mbapp[eé]|de bruyne|lewandowski|bellingham|curry|lebron)\b")
                .unwrap(),
        ),
        (
            "league",
            Regex::new(r"(?i)\b(premier league|la liga|champions league|serie a|bundesliga|nba|euroleague)\b")
                .unwrap(),
        ),
    ]
});

static PRICE_UNDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^under\s*\$?(\d+)$").unwrap());
static PRICE_ABOVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:above|over)\s*\$?(\d+)$").unwrap());
static PRICE_BETWEEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\$?(\d+)\s*(?:-|to|and)\s*\$?(\d+)$").unwrap());

/// 价格区间归一化："under $1000" -> "<1000"，"$300 to $700" -> "300-700"
fn normalize_price_range(raw: &str) -> String {
    if let Some(caps) = PRICE_UNDER.captures(raw) {
        return format!("<{}", &caps[1]);
    }
    if let Some(caps) = PRICE_ABOVE.captures(raw) {
        return format!(">{}", &caps[1]);
    }
    if let Some(caps) = PRICE_BETWEEN.captures(raw) {
        return format!("{}-{}", &caps[1], &caps[2]);
    }
    raw.to_string()
}

/// 从原始文本中提取全部已知实体
///
/// 同一种类多次命中时保留第一个匹配（文本顺序靠前者优先）。
pub fn extract_entities(text: &str) -> HashMap<String, String> {
    let mut entities = HashMap::new();

    for (kind, pattern) in ENTITY_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            // 捕获组 1 为规范词干（如剥去复数后缀），缺省时退回整体匹配
            let matched = caps
                .get(1)
                .or_else(|| caps.get(0))
                .map(|m| m.as_str())
                .unwrap_or_default();
            let value = if *kind == "price_range" {
                normalize_price_range(caps.get(0).map(|m| m.as_str()).unwrap_or_default())
            } else {
                matched.to_string()
            };
            entities.insert((*kind).to_string(), value);
        }
    }

    entities
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_product_and_price() {
        let entities = extract_entities("recommend a gaming laptop under $1000");
        assert_eq!(entities.get("product_type").map(String::as_str), Some("laptop"));
        assert_eq!(entities.get("price_range").map(String::as_str), Some("<1000"));
    }

    #[test]
    fn test_team_preserves_original_casing() {
        let entities = extract_entities("tell me about Real Madrid");
        assert_eq!(entities.get("team").map(String::as_str), Some("Real Madrid"));
    }

    #[test]
    fn test_plural_product_normalized_to_stem() {
        let entities = extract_entities("tell me about laptops");
        assert_eq!(entities.get("product_type").map(String::as_str), Some("laptop"));
    }

    #[test]
    fn test_no_entities_in_noise() {
        assert!(extract_entities("asdkjaskd").is_empty());
        assert!(extract_entities("").is_empty());
    }

    #[test]
    fn test_brand_and_sport() {
        let entities = extract_entities("is a Dell good for watching football?");
        assert_eq!(entities.get("brand").map(String::as_str), Some("Dell"));
        assert_eq!(entities.get("sport").map(String::as_str), Some("football"));
    }

    #[rstest]
    #[case("under $600", "<600")]
    #[case("under 600", "<600")]
    #[case("above $2000", ">2000")]
    #[case("over 800", ">800")]
    #[case("$300 to $700", "300-700")]
    #[case("300 - 700", "300-700")]
    #[case("$300 and $700", "300-700")]
    fn test_price_normalization(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_price_range(raw), expected);
    }

    #[test]
    fn test_first_match_wins_per_kind() {
        let entities = extract_entities("phone or laptop?");
        // 文本顺序靠前的 phone 胜出
        assert_eq!(entities.get("product_type").map(String::as_str), Some("phone"));
    }
}
