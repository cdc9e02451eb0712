use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 意图类别
///
/// 枚举顺序即匹配优先级：问候 > 求助 > 商品咨询 > 体育话题 >
/// 一般疑问 > 闲聊兜底。识别器按此顺序做首次命中分发。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    /// 问候
    Greeting,
    /// 求助/能力询问
    HelpRequest,
    /// 商品咨询
    ProductInquiry,
    /// 体育话题
    SportsTopic,
    /// 一般疑问
    GeneralQuestion,
    /// 闲聊
    Conversation,
    /// 无法识别
    Unknown,
}

impl IntentCategory {
    /// 参与优先级匹配的类别，按优先级降序排列
    pub const PRIORITY_ORDER: [IntentCategory; 6] = [
        IntentCategory::Greeting,
        IntentCategory::HelpRequest,
        IntentCategory::ProductInquiry,
        IntentCategory::SportsTopic,
        IntentCategory::GeneralQuestion,
        IntentCategory::Conversation,
    ];

    /// 类别标签
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentCategory::Greeting => "greeting",
            IntentCategory::HelpRequest => "help_request",
            IntentCategory::ProductInquiry => "product_inquiry",
            IntentCategory::SportsTopic => "sports_topic",
            IntentCategory::GeneralQuestion => "general_question",
            IntentCategory::Conversation => "conversation",
            IntentCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for IntentCategory {
    fn default() -> Self {
        IntentCategory::Unknown
    }
}

/// 意图上下文标记
///
/// 识别阶段从文本特征和会话历史推断出的附加信号。
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct IntentContext {
    /// 是否为追问
    pub is_follow_up: bool,
    /// 是否包含明确的告别短语（触发会话进入收尾阶段）
    pub is_closing: bool,
    /// 是否包含问号
    pub has_question_mark: bool,
    /// 是否包含感叹号
    pub has_exclamation: bool,
    /// 词数
    pub word_count: usize,
    /// 去停用词后的关键词（保持文本顺序）
    pub keywords: Vec<String>,
    /// 上一轮意图类别
    pub previous_category: Option<IntentCategory>,
}

/// 意图识别结果
///
/// 每条用户消息产出一个 Intent，产出后不再修改，由流程管理器
/// 消费并归档到会话历史。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    /// 意图类别
    pub category: IntentCategory,

    /// 置信度（0.0 - 1.0），命中模式数占类别模式总数的比例
    pub confidence: f64,

    /// 提取到的实体（实体种类 -> 值）
    pub entities: HashMap<String, String>,

    /// 上下文标记
    pub context: IntentContext,
}

impl Intent {
    /// 构造无法识别的兜底意图
    pub fn unknown() -> Self {
        Self {
            category: IntentCategory::Unknown,
            confidence: 0.0,
            entities: HashMap::new(),
            context: IntentContext::default(),
        }
    }

    /// 识别器自身的置信度下限
    pub const CONFIDENCE_FLOOR: f64 = 0.3;

    /// 识别结果是否足够可信
    pub fn is_confident(&self) -> bool {
        self.confidence >= Self::CONFIDENCE_FLOOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_intent() {
        let intent = Intent::unknown();
        assert_eq!(intent.category, IntentCategory::Unknown);
        assert_eq!(intent.confidence, 0.0);
        assert!(intent.entities.is_empty());
        assert!(!intent.is_confident());
    }

    #[test]
    fn test_priority_order_starts_with_greeting() {
        assert_eq!(
            IntentCategory::PRIORITY_ORDER[0],
            IntentCategory::Greeting
        );
        assert!(!IntentCategory::PRIORITY_ORDER.contains(&IntentCategory::Unknown));
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(IntentCategory::ProductInquiry.as_str(), "product_inquiry");
        assert_eq!(IntentCategory::SportsTopic.to_string(), "sports_topic");
    }
}
