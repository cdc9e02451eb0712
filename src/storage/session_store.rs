use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::session::ConversationSession;

/// 会话存储 trait
///
/// 以会话 ID 为键的 get/put/delete 接口。内存实现用于单机部署与
/// 测试；持久化实现可在不改动管线的前提下替换注入。
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// 读取会话；已过期的会话按不存在处理并被顺手清除
    async fn get(&self, id: &str) -> Result<Option<ConversationSession>>;

    /// 写入（或覆盖）会话
    async fn put(&self, session: ConversationSession) -> Result<()>;

    /// 删除会话
    async fn delete(&self, id: &str) -> Result<bool>;

    /// 当前会话数量
    async fn count(&self) -> Result<usize>;

    /// 清扫全部过期会话，返回清除数量
    async fn cleanup_expired(&self) -> Result<usize>;
}

/// 基于 DashMap 的内存会话存储
pub struct InMemorySessionStore {
    sessions: DashMap<String, ConversationSession>,
    idle_timeout_secs: u64,
}

impl InMemorySessionStore {
    /// 创建新存储，`idle_timeout_secs` 为 0 时会话永不过期
    pub fn new(idle_timeout_secs: u64) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_timeout_secs,
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &str) -> Result<Option<ConversationSession>> {
        if let Some(entry) = self.sessions.get(id) {
            if entry.is_expired(self.idle_timeout_secs) {
                drop(entry);
                self.sessions.remove(id);
                debug!(session_id = id, "session expired on access");
                return Ok(None);
            }
            return Ok(Some(entry.clone()));
        }
        Ok(None)
    }

    async fn put(&self, session: ConversationSession) -> Result<()> {
        self.sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.sessions.remove(id).is_some())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.sessions.len())
    }

    async fn cleanup_expired(&self) -> Result<usize> {
        let expired: Vec<String> = self
            .sessions
            .iter()
            .filter(|entry| entry.is_expired(self.idle_timeout_secs))
            .map(|entry| entry.key().clone())
            .collect();

        for id in &expired {
            self.sessions.remove(id);
        }

        if !expired.is_empty() {
            info!(count = expired.len(), "cleaned up expired sessions");
        }
        Ok(expired.len())
    }
}

/// 创建会话存储
pub fn create_session_store(idle_timeout_secs: u64) -> Box<dyn SessionStore> {
    Box::new(InMemorySessionStore::new(idle_timeout_secs))
}
