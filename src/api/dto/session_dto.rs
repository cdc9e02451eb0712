//! 会话 DTO
//!
//! 定义会话相关的请求和响应数据结构。

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::models::intent::IntentCategory;
use crate::models::session::{ConversationSession, ConversationStage};

/// 会话响应
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// 会话 ID
    pub id: String,
    /// 当前阶段
    pub stage: ConversationStage,
    /// 历史意图类别
    pub intent_history: Vec<IntentCategory>,
    /// 累积实体
    pub entities: HashMap<String, String>,
    /// 对话轮次数
    pub turn_count: u64,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 最后活跃时间
    pub last_active_at: DateTime<Utc>,
}

impl From<ConversationSession> for SessionResponse {
    fn from(session: ConversationSession) -> Self {
        Self {
            id: session.id,
            stage: session.stage,
            intent_history: session.intent_history,
            entities: session.entities,
            turn_count: session.turn_count,
            created_at: session.created_at,
            last_active_at: session.last_active_at,
        }
    }
}

/// 删除会话响应
#[derive(Debug, Serialize)]
pub struct DeleteSessionResponse {
    /// 会话 ID
    pub id: String,
    /// 消息
    pub message: String,
}

/// 过期清理响应
#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    /// 清除的会话数量
    pub removed: usize,
}
