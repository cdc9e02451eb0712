//! 对话 DTO
//!
//! 定义对话相关的请求和响应数据结构。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::intent::IntentCategory;
use crate::models::session::ConversationStage;

/// 对话请求
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ChatRequest {
    /// 会话 ID，缺省时新建会话
    pub session_id: Option<String>,
    /// 用户消息
    pub message: String,
    /// 调用方附加上下文，原样透传到响应元数据
    pub context: Option<HashMap<String, String>>,
}

/// 意图识别结果
#[derive(Debug, Serialize)]
pub struct IntentResponse {
    /// 意图类别
    pub category: IntentCategory,
    /// 置信度
    pub confidence: f64,
    /// 当轮提取到的实体
    pub entities: HashMap<String, String>,
}

/// 对话响应
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// 会话 ID
    pub session_id: String,
    /// 响应正文
    pub text: String,
    /// 追问列表
    pub follow_up_questions: Vec<String>,
    /// 识别结果
    pub intent: IntentResponse,
    /// 会话阶段
    pub stage: ConversationStage,
    /// 是否由本服务处理（否则宿主应升级处理）
    pub handled: bool,
    /// 附加元数据
    pub metadata: HashMap<String, String>,
}
