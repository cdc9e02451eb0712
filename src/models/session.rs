use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::intent::{Intent, IntentCategory};

/// 会话阶段
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStage {
    /// 问候阶段
    Greeting,
    /// 信息收集阶段
    InformationGathering,
    /// 深入讨论阶段
    Discussion,
    /// 收尾阶段（软终态，新的问候可重启会话周期）
    Closing,
}

impl ConversationStage {
    /// 阶段标签
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationStage::Greeting => "greeting",
            ConversationStage::InformationGathering => "information_gathering",
            ConversationStage::Discussion => "discussion",
            ConversationStage::Closing => "closing",
        }
    }
}

impl Default for ConversationStage {
    fn default() -> Self {
        ConversationStage::Greeting
    }
}

/// 会话实体
///
/// 承载单个对话的全部可变状态，由流程管理器独占修改。
/// 实体映射采用覆盖语义：同类实体后值覆盖前值，无关轮次不清除。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSession {
    /// 会话唯一标识
    pub id: String,

    /// 当前阶段
    pub stage: ConversationStage,

    /// 历史意图类别（有界环形缓冲，超限淘汰最旧项）
    pub intent_history: Vec<IntentCategory>,

    /// 累积实体映射
    pub entities: HashMap<String, String>,

    /// 对话轮次计数
    pub turn_count: u64,

    /// 创建时间
    pub created_at: DateTime<Utc>,

    /// 最后活跃时间
    pub last_active_at: DateTime<Utc>,
}

impl ConversationSession {
    /// 创建新会话，初始阶段为 Greeting
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            stage: ConversationStage::Greeting,
            intent_history: Vec::new(),
            entities: HashMap::new(),
            turn_count: 0,
            created_at: now,
            last_active_at: now,
        }
    }

    /// 用指定 ID 创建会话（宿主自带会话标识时使用）
    pub fn with_id(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::new()
        }
    }

    /// 更新最后活跃时间
    pub fn touch(&mut self) {
        self.last_active_at = Utc::now();
    }

    /// 最近一次识别到的意图类别
    pub fn last_category(&self) -> Option<IntentCategory> {
        self.intent_history.last().copied()
    }

    /// 记录一轮意图并合并其实体
    ///
    /// 历史长度由 `history_limit` 约束，0 表示不设上限。
    pub fn record_turn(&mut self, intent: &Intent, history_limit: usize) {
        self.intent_history.push(intent.category);
        if history_limit > 0 {
            while self.intent_history.len() > history_limit {
                self.intent_history.remove(0);
            }
        }
        for (kind, value) in &intent.entities {
            self.entities.insert(kind.clone(), value.clone());
        }
        self.turn_count += 1;
        self.touch();
    }

    /// 是否已超过空闲超时
    pub fn is_expired(&self, idle_timeout_secs: u64) -> bool {
        idle_timeout_secs > 0
            && Utc::now() - self.last_active_at > Duration::seconds(idle_timeout_secs as i64)
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}
