//! Query Handlers 实现

mod speaker_handlers;

pub use speaker_handlers::*;
