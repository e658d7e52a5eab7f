//! Session Command Handlers - 语音连接与读み上げ

use std::sync::Arc;

use crate::application::commands::session_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{PlaybackQueuePort, VoiceSessionPort};
use crate::domain::QueueItem;

/// Join Handler - 加入调用者所在的语音频道
pub struct JoinVoiceHandler {
    voice: Arc<dyn VoiceSessionPort>,
}

impl JoinVoiceHandler {
    pub fn new(voice: Arc<dyn VoiceSessionPort>) -> Self {
        Self { voice }
    }

    pub async fn handle(&self, cmd: JoinVoice) -> Result<JoinVoiceResponse, ApplicationError> {
        let channel = cmd.channel.ok_or(ApplicationError::UserNotInVoice)?;

        self.voice.join(cmd.guild, channel).await?;

        tracing::info!(
            guild_id = %cmd.guild,
            channel_id = %channel,
            channel_name = %cmd.channel_name,
            "Joined voice channel"
        );

        Ok(JoinVoiceResponse {
            channel,
            channel_name: cmd.channel_name,
        })
    }
}

/// Leave Handler - 中止读み上げ并离开语音频道
pub struct LeaveVoiceHandler {
    voice: Arc<dyn VoiceSessionPort>,
    queue: Arc<dyn PlaybackQueuePort>,
}

impl LeaveVoiceHandler {
    pub fn new(voice: Arc<dyn VoiceSessionPort>, queue: Arc<dyn PlaybackQueuePort>) -> Self {
        Self { voice, queue }
    }

    pub async fn handle(&self, cmd: LeaveVoice) -> Result<LeaveVoiceResponse, ApplicationError> {
        if !self.voice.is_connected(cmd.guild).await {
            return Err(ApplicationError::NotConnected);
        }

        // 先断开再取消：断开前入队的消息都会被丢弃，之后的消息因无连接而被忽略
        let left = self.voice.leave(cmd.guild).await;
        let dropped = self.queue.cancel(cmd.guild);
        left?;

        tracing::info!(guild_id = %cmd.guild, dropped = dropped, "Left voice channel");

        Ok(LeaveVoiceResponse { dropped })
    }
}

/// SpeakMessage Handler - 把听专频道的消息放入读み上げ队列
pub struct SpeakMessageHandler {
    voice: Arc<dyn VoiceSessionPort>,
    queue: Arc<dyn PlaybackQueuePort>,
}

impl SpeakMessageHandler {
    pub fn new(voice: Arc<dyn VoiceSessionPort>, queue: Arc<dyn PlaybackQueuePort>) -> Self {
        Self { voice, queue }
    }

    pub async fn handle(&self, cmd: SpeakMessage) -> SpeakMessageResponse {
        let text = cmd.text.trim();
        if text.is_empty() {
            return SpeakMessageResponse::Ignored;
        }

        if !self.voice.is_connected(cmd.guild).await {
            tracing::trace!(guild_id = %cmd.guild, "No voice connection, message ignored");
            return SpeakMessageResponse::Ignored;
        }

        let item = QueueItem::new(cmd.guild, text);
        let item_id = item.id;
        let outcome = self.queue.enqueue(item);

        tracing::debug!(
            guild_id = %cmd.guild,
            item_id = %item_id,
            pending = outcome.pending,
            started_drain = outcome.started_drain,
            "Message queued"
        );

        SpeakMessageResponse::Queued {
            pending: outcome.pending,
            started_drain: outcome.started_drain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{EnqueueOutcome, QueueState};
    use crate::domain::{ChannelKey, GuildKey};
    use crate::infrastructure::adapters::FakeVoiceSession;
    use std::sync::Mutex;

    const GUILD: GuildKey = GuildKey::new(7);

    /// 只记录调用的队列
    #[derive(Default)]
    struct RecordingQueue {
        items: Mutex<Vec<String>>,
        cancelled: Mutex<Vec<GuildKey>>,
        /// cancel 时语音连接是否仍然存在
        connected_at_cancel: Mutex<Vec<bool>>,
        voice: Option<Arc<FakeVoiceSession>>,
    }

    impl RecordingQueue {
        fn watching(voice: Arc<FakeVoiceSession>) -> Self {
            Self {
                voice: Some(voice),
                ..Default::default()
            }
        }
    }

    impl PlaybackQueuePort for RecordingQueue {
        fn enqueue(&self, item: QueueItem) -> EnqueueOutcome {
            let mut items = self.items.lock().unwrap();
            items.push(item.text);
            EnqueueOutcome {
                pending: items.len(),
                started_drain: items.len() == 1,
            }
        }

        fn cancel(&self, guild: GuildKey) -> usize {
            self.cancelled.lock().unwrap().push(guild);
            if let Some(voice) = &self.voice {
                self.connected_at_cancel
                    .lock()
                    .unwrap()
                    .push(voice.connected(guild));
            }
            let mut items = self.items.lock().unwrap();
            let dropped = items.len();
            items.clear();
            dropped
        }

        fn state(&self, _guild: GuildKey) -> QueueState {
            QueueState::Idle
        }

        fn pending(&self, _guild: GuildKey) -> usize {
            self.items.lock().unwrap().len()
        }
    }

    #[tokio::test]
    async fn test_join_requires_caller_in_voice() {
        let voice = Arc::new(FakeVoiceSession::new());
        let handler = JoinVoiceHandler::new(voice.clone());

        let result = handler
            .handle(JoinVoice {
                guild: GUILD,
                channel: None,
                channel_name: String::new(),
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::UserNotInVoice)));

        let response = handler
            .handle(JoinVoice {
                guild: GUILD,
                channel: Some(ChannelKey::new(100)),
                channel_name: "雑談".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.channel_name, "雑談");
        assert!(voice.is_connected(GUILD).await);
    }

    #[tokio::test]
    async fn test_join_reports_connection_error() {
        let voice = Arc::new(FakeVoiceSession::new());
        voice.fail_next_join("gateway timeout");
        let handler = JoinVoiceHandler::new(voice.clone());

        let result = handler
            .handle(JoinVoice {
                guild: GUILD,
                channel: Some(ChannelKey::new(100)),
                channel_name: "雑談".to_string(),
            })
            .await;
        match result {
            Err(err @ ApplicationError::ConnectionError(_)) => {
                assert_eq!(err.user_message(), "エラーが発生しました: gateway timeout");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_leave_cancels_queue() {
        let voice = Arc::new(FakeVoiceSession::new());
        let queue = Arc::new(RecordingQueue::watching(voice.clone()));
        voice.join(GUILD, ChannelKey::new(1)).await.unwrap();
        queue.enqueue(QueueItem::new(GUILD, "a"));
        queue.enqueue(QueueItem::new(GUILD, "b"));

        let handler = LeaveVoiceHandler::new(voice.clone(), queue.clone());
        let response = handler.handle(LeaveVoice { guild: GUILD }).await.unwrap();

        assert_eq!(response.dropped, 2);
        assert_eq!(*queue.cancelled.lock().unwrap(), vec![GUILD]);
        // 取消发生在断开之后，不会再有消息落入新的令牌下
        assert_eq!(*queue.connected_at_cancel.lock().unwrap(), vec![false]);
        assert!(!voice.is_connected(GUILD).await);

        let result = handler.handle(LeaveVoice { guild: GUILD }).await;
        assert!(matches!(result, Err(ApplicationError::NotConnected)));
    }

    #[tokio::test]
    async fn test_speak_requires_connection_and_text() {
        let voice = Arc::new(FakeVoiceSession::new());
        let queue = Arc::new(RecordingQueue::default());
        let handler = SpeakMessageHandler::new(voice.clone(), queue.clone());

        let response = handler
            .handle(SpeakMessage { guild: GUILD, text: "こんにちは".to_string() })
            .await;
        assert_eq!(response, SpeakMessageResponse::Ignored);

        voice.join(GUILD, ChannelKey::new(1)).await.unwrap();

        let response = handler
            .handle(SpeakMessage { guild: GUILD, text: "   ".to_string() })
            .await;
        assert_eq!(response, SpeakMessageResponse::Ignored);

        let response = handler
            .handle(SpeakMessage { guild: GUILD, text: " こんにちは ".to_string() })
            .await;
        assert_eq!(
            response,
            SpeakMessageResponse::Queued { pending: 1, started_drain: true }
        );
        assert_eq!(*queue.items.lock().unwrap(), vec!["こんにちは".to_string()]);
    }
}
