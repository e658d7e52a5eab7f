//! Discord Gateway Layer
//!
//! serenity 事件处理与 slash command，只做参数提取和回复，业务在应用层

mod commands;
mod handler;
mod replies;

pub use commands::{definitions, SlashCommand};
pub use handler::{BotHandler, BotHandlerConfig, BotHandlers};
