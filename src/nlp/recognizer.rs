//! 意图识别器
//!
//! 按固定优先级顺序评估各类别的模式集合，首个命中的类别胜出。
//! 这是刻意的平局裁决规则而非打分集成：问候 > 求助 > 商品咨询 >
//! 体育话题 > 一般疑问 > 闲聊兜底。全部未命中时返回 Unknown。

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::models::intent::{Intent, IntentCategory, IntentContext};
use crate::models::session::ConversationSession;
use crate::nlp::engine::TextEngine;
use crate::nlp::entities::extract_entities;

/// 单个类别的模式集合
struct CategoryPatterns {
    category: IntentCategory,
    patterns: Vec<Regex>,
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("intent pattern must compile"))
        .collect()
}

/// 按优先级降序排列的类别模式表
static INTENT_PATTERNS: Lazy<Vec<CategoryPatterns>> = Lazy::new(|| {
    vec![
        CategoryPatterns {
            category: IntentCategory::Greeting,
            patterns: compile(&[
                r"(?i)\b(hi|hello|hey|good morning|good afternoon|good evening|greetings)\b",
                r"(?i)\b(how are you|how do you do|what'?s up)\b",
                r"(?i)\b(nice to meet you|pleased to meet you)\b",
            ]),
        },
        CategoryPatterns {
            category: IntentCategory::HelpRequest,
            patterns: compile(&[
                r"(?i)\b(help|assist|support|guide|how to|what can you do)\b",
                r"(?i)\b(need help|require assistance|looking for help)\b",
                r"(?i)\b(show me|teach me|demonstrate)\b",
            ]),
        },
        CategoryPatterns {
            category: IntentCategory::ProductInquiry,
            patterns: compile(&[
                r"(?i)\b(laptop|phone|tablet|computer|smartphone|iphone|android)s?\b",
                r"(?i)\b(buy|purchase|price|cost|recommend|suggest)\b",
                r"(?i)\b(features|specifications|review|comparison)\b",
                r"(?i)\b(choose|select|pick|which one|what is the best)\b",
            ]),
        },
        CategoryPatterns {
            category: IntentCategory::SportsTopic,
            patterns: compile(&[
                r"(?i)\b(football|soccer|basketball|tennis|cricket|baseball)\b",
                r"(?i)\b(game|match|team|player|score|goal)\b",
                r"(?i)\b(championship|league|tournament|world cup|premier league)\b",
                r"(?i)\b(real madrid|barcelona|manchester united|manchester city|liverpool|chelsea|arsenal|bayern munich|lakers|warriors|celtics)\b",
                r"(?i)\b(messi|ronaldo|haaland|mbapp[eé]|de bruyne|lewandowski|bellingham|curry|lebron)\b",
            ]),
        },
        CategoryPatterns {
            category: IntentCategory::GeneralQuestion,
            patterns: compile(&[
                r"(?i)\b(what|where|when|why|how|who|which)\b",
                r"(?i)\b(tell me about|explain|describe|define)\b",
                r"\?\s*$",
            ]),
        },
        CategoryPatterns {
            category: IntentCategory::Conversation,
            patterns: compile(&[
                r"(?i)\b(thanks|thank you|cool|awesome|interesting|amazing)\b",
                r"(?i)\b(i (?:think|feel|like|love|agree|disagree))\b",
                r"(?i)\b(yeah|yes|no|ok|okay|sure)\b",
            ]),
        },
    ]
});

static FOLLOW_UP_INDICATORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(what about|how about|also|what if|tell me more|can you explain|why|when|and)\b",
    )
    .unwrap()
});

static CLOSING_PHRASES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(bye|goodbye|see you|farewell|that'?s all|talk to you later|gotta go)\b")
        .unwrap()
});

/// 意图识别 trait
///
/// 实现必须是全函数：任何输入（包括空串）都返回 Intent，绝不报错。
pub trait IntentRecognizer: Send + Sync {
    /// 识别一条用户消息的意图
    fn recognize(&self, text: &str, session: Option<&ConversationSession>) -> Intent;
}

/// 基于规则的意图识别器实现
#[derive(Debug, Default)]
pub struct RuleBasedRecognizer;

impl RuleBasedRecognizer {
    pub fn new() -> Self {
        Self
    }

    /// 置信度启发式：任意命中给 0.5 基准分，命中比例提供加成。
    /// 不是校准概率，只用于宿主的粗粒度分流判断。
    fn pattern_confidence(text: &str, patterns: &[Regex]) -> f64 {
        let matched = patterns.iter().filter(|p| p.is_match(text)).count();
        if matched == 0 {
            return 0.0;
        }
        0.5 + 0.5 * matched as f64 / patterns.len() as f64
    }

    fn analyze_context(text: &str, session: Option<&ConversationSession>) -> IntentContext {
        IntentContext {
            is_follow_up: session.map_or(false, |s| {
                s.turn_count > 0 && FOLLOW_UP_INDICATORS.is_match(text)
            }),
            is_closing: CLOSING_PHRASES.is_match(text),
            has_question_mark: text.contains('?'),
            has_exclamation: text.contains('!'),
            word_count: text.split_whitespace().count(),
            keywords: TextEngine::extract_keywords(text),
            previous_category: session.and_then(|s| s.last_category()),
        }
    }
}

impl IntentRecognizer for RuleBasedRecognizer {
    fn recognize(&self, text: &str, session: Option<&ConversationSession>) -> Intent {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Intent::unknown();
        }

        let context = Self::analyze_context(trimmed, session);
        let entities = extract_entities(trimmed);

        // 首次命中即胜出，体现固定优先级
        for entry in INTENT_PATTERNS.iter() {
            if entry.patterns.iter().any(|p| p.is_match(trimmed)) {
                let confidence = Self::pattern_confidence(trimmed, &entry.patterns);
                debug!(
                    category = entry.category.as_str(),
                    confidence, "intent recognized"
                );
                return Intent {
                    category: entry.category,
                    confidence,
                    entities,
                    context,
                };
            }
        }

        debug!("no intent pattern matched, falling back to unknown");
        Intent {
            category: IntentCategory::Unknown,
            confidence: 0.0,
            entities,
            context,
        }
    }
}

/// 创建意图识别器
pub fn create_intent_recognizer() -> Box<dyn IntentRecognizer> {
    Box::new(RuleBasedRecognizer::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn recognize(text: &str) -> Intent {
        RuleBasedRecognizer::new().recognize(text, None)
    }

    #[rstest]
    #[case("Hi there!", IntentCategory::Greeting)]
    #[case("hello", IntentCategory::Greeting)]
    #[case("good morning everyone", IntentCategory::Greeting)]
    #[case("what can you do", IntentCategory::HelpRequest)]
    #[case("I need help choosing", IntentCategory::HelpRequest)]
    #[case("recommend a gaming laptop under $1000", IntentCategory::ProductInquiry)]
    #[case("tell me about laptops", IntentCategory::ProductInquiry)]
    #[case("tell me about Real Madrid", IntentCategory::SportsTopic)]
    #[case("the premier league is back", IntentCategory::SportsTopic)]
    #[case("where does the sun set", IntentCategory::GeneralQuestion)]
    #[case("thanks, cool", IntentCategory::Conversation)]
    fn test_category_dispatch(#[case] text: &str, #[case] expected: IntentCategory) {
        let intent = recognize(text);
        assert_eq!(intent.category, expected, "input: {text}");
        assert!(intent.confidence > 0.0);
    }

    #[test]
    fn test_greeting_outranks_question() {
        // "hi" 与问号同时出现时，优先级更高的问候胜出
        let intent = recognize("hi, what's up?");
        assert_eq!(intent.category, IntentCategory::Greeting);
    }

    #[test]
    fn test_product_outranks_sports() {
        let intent = recognize("which laptop is best for watching football");
        assert_eq!(intent.category, IntentCategory::ProductInquiry);
    }

    #[test]
    fn test_unmatched_input_yields_unknown() {
        let intent = recognize("asdkjaskd");
        assert_eq!(intent.category, IntentCategory::Unknown);
        assert_eq!(intent.confidence, 0.0);
        assert!(intent.entities.is_empty());
    }

    #[test]
    fn test_confidence_scales_with_matched_patterns() {
        let one = recognize("tell me about Real Madrid").confidence;
        let many = recognize("the football match score in the premier league").confidence;
        assert!(one >= 0.5);
        assert!(one < many);
        assert!(many <= 1.0);
    }

    #[test]
    fn test_empty_input_yields_unknown() {
        let intent = recognize("");
        assert_eq!(intent.category, IntentCategory::Unknown);
        assert_eq!(intent.confidence, 0.0);

        let intent = recognize("   ");
        assert_eq!(intent.category, IntentCategory::Unknown);
    }

    #[test]
    fn test_entities_extracted_regardless_of_category() {
        // 问候类别胜出，但消息中的品牌实体仍需提取
        let intent = recognize("hello, Dell fan here");
        assert_eq!(intent.category, IntentCategory::Greeting);
        assert_eq!(intent.entities.get("brand").map(String::as_str), Some("Dell"));
    }

    #[test]
    fn test_product_scenario_entities() {
        let intent = recognize("recommend a gaming laptop under $1000");
        assert_eq!(intent.category, IntentCategory::ProductInquiry);
        assert_eq!(intent.entities.get("product_type").map(String::as_str), Some("laptop"));
        assert_eq!(intent.entities.get("price_range").map(String::as_str), Some("<1000"));
    }

    #[test]
    fn test_closing_flag() {
        let intent = recognize("goodbye, thanks for everything");
        assert!(intent.context.is_closing);

        let intent = recognize("hello there");
        assert!(!intent.context.is_closing);
    }

    #[test]
    fn test_follow_up_requires_session_history() {
        let recognizer = RuleBasedRecognizer::new();

        // 无会话时不可能是追问
        let intent = recognizer.recognize("tell me more about that", None);
        assert!(!intent.context.is_follow_up);

        let mut session = crate::models::session::ConversationSession::new();
        session.record_turn(&Intent::unknown(), 50);
        let intent = recognizer.recognize("tell me more about that", Some(&session));
        assert!(intent.context.is_follow_up);
        assert_eq!(intent.context.previous_category, Some(IntentCategory::Unknown));
    }

    #[test]
    fn test_question_mark_context() {
        let intent = recognize("what is a good phone?");
        assert!(intent.context.has_question_mark);
        assert_eq!(intent.context.word_count, 5);
        assert_eq!(intent.context.keywords, vec!["what", "good", "phone"]);
    }
}
