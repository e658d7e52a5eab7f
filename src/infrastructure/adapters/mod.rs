//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod filter;
pub mod tts;
pub mod voice;

pub use filter::*;
pub use tts::*;
pub use voice::*;
