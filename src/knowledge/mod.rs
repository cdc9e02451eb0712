//! 知识库模块
//!
//! 体育与商品两张静态事实表，进程启动即就绪，全会话只读共享。
//! 查询走 trait 接口，便于将来替换为外部数据源而不触碰响应策略。

pub mod products;
pub mod sports;

pub use products::{create_product_kb, CategoryProfile, PriceTier, ProductLookup, ProductRecord};
pub use sports::{create_sports_kb, LeagueFacts, PlayerFacts, SportsLookup, SportsTopic, TeamFacts};
