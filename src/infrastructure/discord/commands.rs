//! Slash Command 定义

use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption};

/// `speed` 命令的参数名
pub const SPEED_OPTION: &str = "speed";
/// `speaker` 命令的参数名
pub const SPEAKER_OPTION: &str = "speaker_id";

/// bot 提供的 slash command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashCommand {
    Join,
    Leave,
    Speed,
    Speakers,
    Speaker,
}

impl SlashCommand {
    pub const ALL: [SlashCommand; 5] = [
        SlashCommand::Join,
        SlashCommand::Leave,
        SlashCommand::Speed,
        SlashCommand::Speakers,
        SlashCommand::Speaker,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SlashCommand::Join => "join",
            SlashCommand::Leave => "leave",
            SlashCommand::Speed => "speed",
            SlashCommand::Speakers => "speakers",
            SlashCommand::Speaker => "speaker",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    fn description(&self) -> &'static str {
        match self {
            SlashCommand::Join => "ボイスチャンネルに参加します",
            SlashCommand::Leave => "ボイスチャンネルから退出します",
            SlashCommand::Speed => "読み上げ速度を設定します",
            SlashCommand::Speakers => "利用可能な話者の一覧を表示します",
            SlashCommand::Speaker => "話者を設定します",
        }
    }

    /// 注册用的命令定义
    pub fn definition(&self) -> CreateCommand {
        let command = CreateCommand::new(self.name())
            .description(self.description())
            .dm_permission(false);

        match self {
            SlashCommand::Speed => command.add_option(
                CreateCommandOption::new(
                    CommandOptionType::Number,
                    SPEED_OPTION,
                    "読み上げ速度 (1.0から3.0)",
                )
                .required(true),
            ),
            SlashCommand::Speaker => command.add_option(
                CreateCommandOption::new(CommandOptionType::Integer, SPEAKER_OPTION, "話者ID")
                    .required(true),
            ),
            _ => command,
        }
    }
}

/// 所有命令的定义
pub fn definitions() -> Vec<CreateCommand> {
    SlashCommand::ALL.iter().map(|c| c.definition()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names() {
        for command in SlashCommand::ALL {
            assert_eq!(SlashCommand::from_name(command.name()), Some(command));
        }
        assert_eq!(SlashCommand::from_name("play"), None);
        assert_eq!(definitions().len(), 5);
    }
}
