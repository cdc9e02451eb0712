//! 会话流程管理
//!
//! 以 (当前阶段, 新意图) 为键的固定转移表。所有转移由到达的意图
//! 同步触发，不存在基于时间的转移。Closing 是软终态：收到新的问候
//! 即重启会话周期，避免死会话。

use tracing::debug;

use crate::models::intent::{Intent, IntentCategory};
use crate::models::session::{ConversationSession, ConversationStage};

/// 流程策略 trait
pub trait FlowStrategy: Send + Sync {
    /// 由当前阶段与新意图决定下一阶段
    fn next_stage(&self, current: ConversationStage, intent: &Intent) -> ConversationStage;
}

/// 默认流程策略
#[derive(Debug, Default)]
pub struct DefaultFlowStrategy;

impl FlowStrategy for DefaultFlowStrategy {
    fn next_stage(&self, current: ConversationStage, intent: &Intent) -> ConversationStage {
        use ConversationStage as Stage;
        use IntentCategory as Cat;

        // 明确的告别短语在任何阶段都触发收尾
        if intent.context.is_closing {
            return Stage::Closing;
        }

        match (current, intent.category) {
            // 无法识别的输入不推动阶段
            (stage, Cat::Unknown) => stage,

            // 新问候重启周期（含从 Closing 复活）
            (_, Cat::Greeting) => Stage::Greeting,

            (Stage::Greeting, Cat::SportsTopic) | (Stage::Greeting, Cat::Conversation) => {
                Stage::Discussion
            }
            (Stage::Greeting, _) => Stage::InformationGathering,

            // 追问保持在当前阶段，继续收集信息
            (Stage::InformationGathering, _) if intent.context.is_follow_up => {
                Stage::InformationGathering
            }
            (Stage::InformationGathering, Cat::SportsTopic)
            | (Stage::InformationGathering, Cat::Conversation) => Stage::Discussion,
            (Stage::InformationGathering, _) => Stage::InformationGathering,

            (Stage::Discussion, _) => Stage::Discussion,

            // Closing 继续接收输入但不自行复活
            (Stage::Closing, _) => Stage::Closing,
        }
    }
}

/// 流程管理器
///
/// 独占修改会话状态：归档意图、合并实体、推进阶段。
pub struct FlowManager {
    strategy: Box<dyn FlowStrategy>,
    history_limit: usize,
}

impl FlowManager {
    pub fn new(strategy: Box<dyn FlowStrategy>, history_limit: usize) -> Self {
        Self {
            strategy,
            history_limit,
        }
    }

    /// 处理一轮意图：更新会话并返回新阶段
    pub fn apply(&self, session: &mut ConversationSession, intent: &Intent) -> ConversationStage {
        let next = self.strategy.next_stage(session.stage, intent);
        debug!(
            session_id = %session.id,
            from = session.stage.as_str(),
            to = next.as_str(),
            category = intent.category.as_str(),
            "stage transition"
        );
        session.stage = next;
        session.record_turn(intent, self.history_limit);
        next
    }
}

/// 创建流程管理器
pub fn create_flow_manager(history_limit: usize) -> FlowManager {
    FlowManager::new(Box::new(DefaultFlowStrategy), history_limit)
}
