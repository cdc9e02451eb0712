//! 服务模块

pub mod chat;
pub mod flow;
pub mod responder;

pub use chat::{create_chat_service, ChatOutcome, ChatService, ChatServiceImpl};
pub use flow::{create_flow_manager, DefaultFlowStrategy, FlowManager, FlowStrategy};
pub use responder::{create_response_generator, ResponseGenerator, ResponseStrategy};
