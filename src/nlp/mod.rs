//! 自然语言处理模块
//!
//! 提供文本预处理、实体提取和基于规则的意图识别。
//! 所有函数均为纯内存计算，识别失败以 Unknown 意图表达，绝不报错。

pub mod engine;
pub mod entities;
pub mod recognizer;

pub use engine::TextEngine;
pub use entities::extract_entities;
pub use recognizer::{create_intent_recognizer, IntentRecognizer, RuleBasedRecognizer};
