use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::intent::IntentCategory;

/// 响应实体
///
/// 由响应策略生成，产出后不可变，交还宿主序列化为 JSON。
/// 每个策略必须至少附带一个追问，兜底策略附带的是通用引导问题。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    /// 响应正文
    pub text: String,

    /// 响应置信度（0.0 - 1.0）
    pub confidence: f64,

    /// 来源意图类别
    pub category: IntentCategory,

    /// 追问列表（保持生成顺序）
    pub follow_up_questions: Vec<String>,

    /// 附加元数据
    pub metadata: HashMap<String, String>,
}

impl Reply {
    /// 创建新响应
    pub fn new(text: impl Into<String>, confidence: f64, category: IntentCategory) -> Self {
        Self {
            text: text.into(),
            confidence,
            category,
            follow_up_questions: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    /// 附加追问
    pub fn with_follow_ups<I, S>(mut self, questions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.follow_up_questions
            .extend(questions.into_iter().map(Into::into));
        self
    }

    /// 附加元数据
    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_builder() {
        let reply = Reply::new("hello", 0.9, IntentCategory::Greeting)
            .with_follow_ups(["What would you like to know about?"])
            .with_metadata("strategy", "greeting");

        assert_eq!(reply.text, "hello");
        assert_eq!(reply.category, IntentCategory::Greeting);
        assert_eq!(reply.follow_up_questions.len(), 1);
        assert_eq!(reply.metadata.get("strategy").map(String::as_str), Some("greeting"));
    }
}
