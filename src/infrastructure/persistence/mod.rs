//! Persistence Layer - 数据持久化
//!
//! 服务器设置的 Sled 存储实现

pub mod sled;

pub use self::sled::SledVoiceStateStore;
