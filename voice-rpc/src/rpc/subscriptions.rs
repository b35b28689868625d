use super::payloads::{Command, EventType};
use model::channel::Channel;
use model::Snowflake;

/// Events that are scoped to a single voice channel.
pub const CHANNEL_EVENTS: [EventType; 5] = [
    EventType::VoiceStateCreate,
    EventType::VoiceStateUpdate,
    EventType::VoiceStateDelete,
    EventType::SpeakingStart,
    EventType::SpeakingStop,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub cmd: Command,
    pub evt: EventType,
    pub channel_id: Snowflake,
}

/// Keeps the channel-scoped subscriptions pointed at the channel the local
/// user is in.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    current: Option<Channel>,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Channel> {
        self.current.as_ref()
    }

    /// Returns the commands that move the subscriptions to `channel`: the
    /// old channel is released before the new one is subscribed to.
    pub fn set_channel(&mut self, channel: Option<Channel>) -> Vec<Subscription> {
        if self.current == channel {
            return Vec::new();
        }

        let mut commands = Vec::with_capacity(CHANNEL_EVENTS.len() * 2);

        if let Some(old) = self.current.take() {
            commands.extend(Self::build(Command::Unsubscribe, &old.channel_id));
        }

        if let Some(new) = &channel {
            commands.extend(Self::build(Command::Subscribe, &new.channel_id));
        }

        self.current = channel;
        commands
    }

    /// Forgets the current channel without unsubscribing. Server-side
    /// subscriptions die with the connection.
    pub fn reset(&mut self) {
        self.current = None;
    }

    fn build<'a>(
        cmd: Command,
        channel_id: &'a Snowflake,
    ) -> impl Iterator<Item = Subscription> + 'a {
        CHANNEL_EVENTS.iter().map(move |evt| Subscription {
            cmd: cmd.clone(),
            evt: *evt,
            channel_id: channel_id.clone(),
        })
    }
}
