//! Parley - 规则驱动的对话意图服务
//!
//! 为零售分析 Copilot 提供进程内的对话管线：意图识别、会话状态机、
//! 响应策略分发与静态知识库查询，全程无外部模型调用。

pub mod api;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod models;
pub mod nlp;
pub mod observability;
pub mod services;
pub mod storage;
