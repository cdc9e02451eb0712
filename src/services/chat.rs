//! 对话编排服务
//!
//! 串联单轮管线：取会话 -> 识别意图 -> 推进流程 -> 生成响应 ->
//! 回写会话。宿主只拿到最终结论（响应 + 是否由本服务处理），
//! 低置信或无法识别的轮次标记为未处理，交由宿主升级。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::config::NlpConfig;
use crate::error::Result;
use crate::knowledge::products::ProductLookup;
use crate::knowledge::sports::SportsLookup;
use crate::models::intent::{Intent, IntentCategory};
use crate::models::reply::Reply;
use crate::models::session::{ConversationSession, ConversationStage};
use crate::nlp::recognizer::{create_intent_recognizer, IntentRecognizer};
use crate::services::flow::{create_flow_manager, FlowManager};
use crate::services::responder::{create_response_generator, ResponseGenerator};
use crate::storage::session_store::SessionStore;

/// 单轮处理结果
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    /// 会话 ID（新会话时为新分配的 ID）
    pub session_id: String,
    /// 处理后的会话阶段
    pub stage: ConversationStage,
    /// 识别出的意图
    pub intent: Intent,
    /// 生成的响应
    pub reply: Reply,
    /// 本服务是否有把握处理该轮（否则宿主应升级处理）
    pub handled: bool,
    /// 本轮是否新建了会话
    pub session_created: bool,
}

/// 对话服务 trait
#[async_trait]
pub trait ChatService: Send + Sync {
    /// 处理一条用户消息
    ///
    /// `session_id` 为 None 或指向不存在/已过期的会话时新建会话。
    /// `context` 是调用方的自由键值对，原样透传到响应元数据，
    /// 不参与识别，策略写入的键优先。
    async fn handle_message(
        &self,
        session_id: Option<&str>,
        message: &str,
        context: Option<&HashMap<String, String>>,
    ) -> Result<ChatOutcome>;
}

/// 默认对话服务实现
pub struct ChatServiceImpl {
    store: Arc<dyn SessionStore>,
    recognizer: Box<dyn IntentRecognizer>,
    flow: FlowManager,
    generator: ResponseGenerator,
    handoff_threshold: f64,
}

impl ChatServiceImpl {
    pub fn new(
        store: Arc<dyn SessionStore>,
        recognizer: Box<dyn IntentRecognizer>,
        flow: FlowManager,
        generator: ResponseGenerator,
        handoff_threshold: f64,
    ) -> Self {
        Self {
            store,
            recognizer,
            flow,
            generator,
            handoff_threshold,
        }
    }

    async fn load_or_create(
        &self,
        session_id: Option<&str>,
    ) -> Result<(ConversationSession, bool)> {
        match session_id {
            Some(id) => {
                if let Some(session) = self.store.get(id).await? {
                    return Ok((session, false));
                }
                // 调用方携带的 ID 已过期或不存在，按该 ID 重建
                debug!(session_id = id, "session not found, creating with caller id");
                Ok((ConversationSession::with_id(id), true))
            }
            None => Ok((ConversationSession::new(), true)),
        }
    }
}

#[async_trait]
impl ChatService for ChatServiceImpl {
    async fn handle_message(
        &self,
        session_id: Option<&str>,
        message: &str,
        context: Option<&HashMap<String, String>>,
    ) -> Result<ChatOutcome> {
        let (mut session, session_created) = self.load_or_create(session_id).await?;

        let intent = self.recognizer.recognize(message, Some(&session));
        let stage = self.flow.apply(&mut session, &intent);
        let mut reply = self.generator.generate(&intent, &session);

        if let Some(context) = context {
            for (key, value) in context {
                reply
                    .metadata
                    .entry(key.clone())
                    .or_insert_with(|| value.clone());
            }
        }

        // 识别器自身的置信度下限与宿主阈值同时把关
        let handled = intent.category != IntentCategory::Unknown
            && intent.is_confident()
            && intent.confidence >= self.handoff_threshold;

        info!(
            session_id = %session.id,
            category = intent.category.as_str(),
            confidence = intent.confidence,
            stage = stage.as_str(),
            handled,
            "turn processed"
        );

        let outcome = ChatOutcome {
            session_id: session.id.clone(),
            stage,
            intent,
            reply,
            handled,
            session_created,
        };

        self.store.put(session).await?;
        Ok(outcome)
    }
}

/// 创建对话服务
pub fn create_chat_service(
    config: &NlpConfig,
    store: Arc<dyn SessionStore>,
    product_kb: Arc<dyn ProductLookup>,
    sports_kb: Arc<dyn SportsLookup>,
) -> Box<dyn ChatService> {
    Box::new(ChatServiceImpl::new(
        store,
        create_intent_recognizer(),
        create_flow_manager(config.history_limit),
        create_response_generator(product_kb, sports_kb, config.follow_up_limit),
        config.handoff_threshold,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::products::StaticProductKb;
    use crate::knowledge::sports::StaticSportsKb;
    use crate::storage::session_store::InMemorySessionStore;

    fn service_with_store() -> (Box<dyn ChatService>, Arc<dyn SessionStore>) {
        let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(3600));
        let service = create_chat_service(
            &NlpConfig::default(),
            store.clone(),
            Arc::new(StaticProductKb),
            Arc::new(StaticSportsKb),
        );
        (service, store)
    }

    #[tokio::test]
    async fn test_greeting_turn() {
        let (service, _) = service_with_store();
        let outcome = service.handle_message(None, "hi", None).await.unwrap();

        assert_eq!(outcome.intent.category, IntentCategory::Greeting);
        assert_eq!(outcome.stage, ConversationStage::Greeting);
        assert!(outcome.handled);
        assert!(outcome.session_created);
        assert!(!outcome.reply.follow_up_questions.is_empty());
    }

    #[tokio::test]
    async fn test_gibberish_is_not_handled() {
        let (service, _) = service_with_store();
        let outcome = service.handle_message(None, "asdkjaskd", None).await.unwrap();

        assert_eq!(outcome.intent.category, IntentCategory::Unknown);
        assert_eq!(outcome.intent.confidence, 0.0);
        assert!(!outcome.handled);
        assert!(outcome
            .reply
            .follow_up_questions
            .iter()
            .any(|q| q.to_lowercase().contains("rephrase")));
    }

    #[tokio::test]
    async fn test_session_persists_across_turns() {
        let (service, store) = service_with_store();

        let first = service
            .handle_message(None, "recommend a gaming laptop under $1000", None)
            .await
            .unwrap();
        assert_eq!(first.intent.category, IntentCategory::ProductInquiry);
        assert!(first.handled);

        let second = service
            .handle_message(Some(&first.session_id), "what about Dell?", None)
            .await
            .unwrap();
        assert_eq!(second.session_id, first.session_id);

        let session = store.get(&first.session_id).await.unwrap().unwrap();
        assert_eq!(session.turn_count, 2);
        // 第一轮的实体在第二轮后仍然保留
        assert_eq!(
            session.entities.get("product_type").map(String::as_str),
            Some("laptop")
        );
        assert_eq!(
            session.entities.get("price_range").map(String::as_str),
            Some("<1000")
        );
    }

    #[tokio::test]
    async fn test_caller_supplied_id_creates_session() {
        let (service, store) = service_with_store();
        let outcome = service
            .handle_message(Some("client-abc"), "hello there", None)
            .await
            .unwrap();

        assert_eq!(outcome.session_id, "client-abc");
        assert!(outcome.session_created);
        assert!(store.get("client-abc").await.unwrap().is_some());

        // 同一 ID 的第二轮命中已有会话
        let second = service
            .handle_message(Some("client-abc"), "hello again", None)
            .await
            .unwrap();
        assert!(!second.session_created);
    }

    #[tokio::test]
    async fn test_caller_context_lands_in_reply_metadata() {
        let (service, _) = service_with_store();
        let mut context = HashMap::new();
        context.insert("channel".to_string(), "mobile_app".to_string());
        context.insert("strategy".to_string(), "caller_override".to_string());

        let outcome = service
            .handle_message(None, "hi", Some(&context))
            .await
            .unwrap();

        assert_eq!(
            outcome.reply.metadata.get("channel").map(String::as_str),
            Some("mobile_app")
        );
        // 策略自身写入的键不被调用方上下文覆盖
        assert_eq!(
            outcome.reply.metadata.get("strategy").map(String::as_str),
            Some("greeting")
        );
    }

    #[tokio::test]
    async fn test_low_confidence_is_not_handled() {
        /// 固定类别与置信度的识别器，用于隔离编排层的把关逻辑
        struct FixedRecognizer {
            confidence: f64,
        }

        impl IntentRecognizer for FixedRecognizer {
            fn recognize(&self, _message: &str, _session: Option<&ConversationSession>) -> Intent {
                Intent {
                    category: IntentCategory::SportsTopic,
                    confidence: self.confidence,
                    ..Intent::unknown()
                }
            }
        }

        let build = |confidence: f64| {
            let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(3600));
            let product_kb: Arc<dyn ProductLookup> = Arc::new(StaticProductKb);
            let sports_kb: Arc<dyn SportsLookup> = Arc::new(StaticSportsKb);
            ChatServiceImpl::new(
                store,
                Box::new(FixedRecognizer { confidence }),
                create_flow_manager(50),
                create_response_generator(product_kb, sports_kb, 3),
                0.1,
            )
        };

        // 低于识别下限的轮次即使过了宿主阈值也不算处理
        let low = build(0.2).handle_message(None, "soccer", None).await.unwrap();
        assert!(!low.handled);

        let ok = build(0.4).handle_message(None, "soccer", None).await.unwrap();
        assert!(ok.handled);
    }

    #[tokio::test]
    async fn test_sports_turn_carries_kb_fact() {
        let (service, _) = service_with_store();
        let outcome = service
            .handle_message(None, "tell me about Real Madrid", None)
            .await
            .unwrap();

        assert_eq!(outcome.intent.category, IntentCategory::SportsTopic);
        assert!(outcome.handled);
        assert!(outcome.reply.text.contains("Santiago Bernabéu"));
    }

    #[tokio::test]
    async fn test_goodbye_closes_session() {
        let (service, store) = service_with_store();
        let first = service.handle_message(None, "hi", None).await.unwrap();
        let second = service
            .handle_message(Some(&first.session_id), "goodbye", None)
            .await
            .unwrap();

        assert_eq!(second.stage, ConversationStage::Closing);
        let session = store.get(&first.session_id).await.unwrap().unwrap();
        assert_eq!(session.stage, ConversationStage::Closing);
    }
}
