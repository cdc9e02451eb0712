//! 存储模块
//!
//! 会话存储接口与内存实现。管线通过注入的 trait 访问会话，
//! 不持有任何进程级全局状态。

pub mod session_store;

pub use session_store::{create_session_store, InMemorySessionStore, SessionStore};
