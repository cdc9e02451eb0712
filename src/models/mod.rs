//! 数据模型模块

pub mod intent;
pub mod reply;
pub mod session;

pub use intent::{Intent, IntentCategory, IntentContext};
pub use reply::Reply;
pub use session::{ConversationSession, ConversationStage};
