//! Gateway Event Handler
//!
//! 注册命令、分发 interaction、把听专频道的消息转为读み上げ命令

use async_trait::async_trait;
use serenity::all::{
    ActivityData, ChannelId, Command, CommandInteraction, Context, CreateInteractionResponseFollowup,
    EditInteractionResponse, EventHandler, GuildId, Interaction, Message, Ready, UserId,
};
use std::sync::Arc;

use super::commands::{definitions, SlashCommand, SPEAKER_OPTION, SPEED_OPTION};
use super::replies;
use crate::application::{
    JoinVoice, JoinVoiceHandler, LeaveVoice, LeaveVoiceHandler, ListSpeakers, ListSpeakersHandler,
    SetSpeaker, SetSpeakerHandler, SetSpeed, SetSpeedHandler, SpeakMessage, SpeakMessageHandler,
    SpeakMessageResponse,
};
use crate::domain::{ChannelKey, GuildKey};

/// 命令处理器集合
pub struct BotHandlers {
    pub join: JoinVoiceHandler,
    pub leave: LeaveVoiceHandler,
    pub set_speed: SetSpeedHandler,
    pub set_speaker: SetSpeakerHandler,
    pub list_speakers: ListSpeakersHandler,
    pub speak: SpeakMessageHandler,
}

/// Handler 配置
#[derive(Debug, Clone)]
pub struct BotHandlerConfig {
    /// 读み上げ对象文字频道名
    pub listen_channel: String,
    /// 状态中显示的活动
    pub activity: Option<String>,
}

/// serenity 事件处理器
pub struct BotHandler {
    config: BotHandlerConfig,
    handlers: Arc<BotHandlers>,
}

impl BotHandler {
    pub fn new(config: BotHandlerConfig, handlers: Arc<BotHandlers>) -> Self {
        Self { config, handlers }
    }

    /// 调用者当前所在的语音频道
    fn caller_voice_channel(
        ctx: &Context,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Option<(ChannelKey, String)> {
        let guild = ctx.cache.guild(guild_id)?;
        let channel_id = guild.voice_states.get(&user_id)?.channel_id?;
        let name = guild
            .channels
            .get(&channel_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| channel_id.to_string());
        Some((ChannelKey::new(channel_id.get()), name))
    }

    fn is_listen_channel(&self, ctx: &Context, guild_id: GuildId, channel_id: ChannelId) -> bool {
        ctx.cache
            .guild(guild_id)
            .and_then(|g| {
                g.channels
                    .get(&channel_id)
                    .map(|c| c.name == self.config.listen_channel)
            })
            .unwrap_or(false)
    }

    fn number_option(command: &CommandInteraction, name: &str) -> Option<f64> {
        command
            .data
            .options
            .iter()
            .find(|o| o.name == name)
            .and_then(|o| o.value.as_f64().or_else(|| o.value.as_i64().map(|v| v as f64)))
    }

    fn integer_option(command: &CommandInteraction, name: &str) -> Option<i64> {
        command
            .data
            .options
            .iter()
            .find(|o| o.name == name)
            .and_then(|o| o.value.as_i64())
    }

    /// 执行命令，返回按顺序发送的回复
    async fn execute(
        &self,
        ctx: &Context,
        command: &CommandInteraction,
        kind: SlashCommand,
        guild_id: GuildId,
    ) -> Vec<String> {
        let guild = GuildKey::new(guild_id.get());

        match kind {
            SlashCommand::Join => {
                let caller = Self::caller_voice_channel(ctx, guild_id, command.user.id);
                let (channel, channel_name) = match caller {
                    Some((channel, name)) => (Some(channel), name),
                    None => (None, String::new()),
                };
                let result = self
                    .handlers
                    .join
                    .handle(JoinVoice {
                        guild,
                        channel,
                        channel_name,
                    })
                    .await;
                vec![replies::join(result)]
            }
            SlashCommand::Leave => {
                let result = self.handlers.leave.handle(LeaveVoice { guild }).await;
                vec![replies::leave(result)]
            }
            SlashCommand::Speed => match Self::number_option(command, SPEED_OPTION) {
                Some(speed) => {
                    let result = self.handlers.set_speed.handle(SetSpeed { guild, speed });
                    vec![replies::speed(result)]
                }
                None => vec![replies::missing_option(SPEED_OPTION)],
            },
            SlashCommand::Speakers => {
                let result = self
                    .handlers
                    .list_speakers
                    .handle(ListSpeakers::default())
                    .await;
                replies::speakers(result)
            }
            SlashCommand::Speaker => match Self::integer_option(command, SPEAKER_OPTION) {
                Some(speaker_id) => {
                    let result = self
                        .handlers
                        .set_speaker
                        .handle(SetSpeaker { guild, speaker_id })
                        .await;
                    vec![replies::speaker(result)]
                }
                None => vec![replies::missing_option(SPEAKER_OPTION)],
            },
        }
    }

    /// 第一页编辑进延迟的回复，其余作为 follow-up
    async fn send_pages(&self, ctx: &Context, command: &CommandInteraction, pages: Vec<String>) {
        let mut pages = pages.into_iter();
        let first = pages.next().unwrap_or_default();

        if let Err(e) = command
            .edit_response(&ctx.http, EditInteractionResponse::new().content(first))
            .await
        {
            tracing::error!(command = %command.data.name, error = %e, "Failed to send reply");
            return;
        }

        for page in pages {
            let followup = CreateInteractionResponseFollowup::new()
                .content(page)
                .ephemeral(true);
            if let Err(e) = command.create_followup(&ctx.http, followup).await {
                tracing::error!(command = %command.data.name, error = %e, "Failed to send follow-up");
                break;
            }
        }
    }

    async fn dispatch(&self, ctx: &Context, command: &CommandInteraction) {
        let Some(kind) = SlashCommand::from_name(&command.data.name) else {
            tracing::warn!(command = %command.data.name, "Unknown command");
            return;
        };

        // 合成或入会可能超过 3 秒的响应期限
        if let Err(e) = command.defer_ephemeral(&ctx.http).await {
            tracing::error!(command = kind.name(), error = %e, "Failed to defer interaction");
            return;
        }

        let pages = match command.guild_id {
            Some(guild_id) => {
                tracing::debug!(
                    command = kind.name(),
                    guild_id = %guild_id,
                    user_id = %command.user.id,
                    "Command received"
                );
                self.execute(ctx, command, kind, guild_id).await
            }
            None => vec![replies::GUILD_ONLY.to_string()],
        };

        self.send_pages(ctx, command, pages).await;
    }
}

#[async_trait]
impl EventHandler for BotHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "Connected to Discord gateway"
        );

        if let Some(activity) = &self.config.activity {
            ctx.set_activity(Some(ActivityData::playing(activity.clone())));
        }

        match Command::set_global_commands(&ctx.http, definitions()).await {
            Ok(commands) => {
                tracing::info!(count = commands.len(), "Slash commands registered");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to register slash commands");
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            self.dispatch(&ctx, &command).await;
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(guild_id) = msg.guild_id else {
            return;
        };
        if !self.is_listen_channel(&ctx, guild_id, msg.channel_id) {
            return;
        }

        let response = self
            .handlers
            .speak
            .handle(SpeakMessage {
                guild: GuildKey::new(guild_id.get()),
                text: msg.content.clone(),
            })
            .await;

        if let SpeakMessageResponse::Queued { pending, .. } = response {
            tracing::trace!(guild_id = %guild_id, message_id = %msg.id, pending = pending, "Listen channel message queued");
        }
    }
}
