//! 处理器模块

pub mod chat_handler;
pub mod session_handler;
