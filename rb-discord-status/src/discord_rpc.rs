use discord_rich_presence::{
    DiscordIpc, DiscordIpcClient,
    activity::{self},
    error,
};

use crate::{
    error::PresenceError,
    presence::{PresenceClient, PresenceUpdate},
};

impl From<error::Error> for PresenceError {
    fn from(e: error::Error) -> Self {
        match e {
            error::Error::NotConnected => PresenceError::NotConnected,
            other => PresenceError::Ipc(other.to_string()),
        }
    }
}

pub struct DiscordRpc {
    client: DiscordIpcClient,
}

impl DiscordRpc {
    pub fn new(client_id: &str) -> Self {
        Self {
            client: DiscordIpcClient::new(client_id),
        }
    }
}

impl PresenceClient for DiscordRpc {
    fn connect(&mut self) -> Result<(), PresenceError> {
        self.client
            .connect()
            .map_err(|e| PresenceError::ConnectionRefused(e.to_string()))
    }

    fn update(&mut self, presence: &PresenceUpdate) -> Result<(), PresenceError> {
        let assets = activity::Assets::new()
            .large_image(presence.large_image.as_str())
            .large_text(presence.large_text.as_str())
            .small_image(presence.small_image.as_str())
            .small_text(presence.small_text.as_str());

        let mut activity = activity::Activity::new()
            .activity_type(activity::ActivityType::Listening)
            .state(presence.state.as_str())
            .details(presence.details.as_str())
            .assets(assets);

        if presence.start.is_some() || presence.end.is_some() {
            let mut ts = activity::Timestamps::new();
            if let Some(start) = presence.start {
                ts = ts.start(start);
            }
            if let Some(end) = presence.end {
                ts = ts.end(end);
            }
            activity = activity.timestamps(ts);
        }

        let send_result = self.client.set_activity(activity.clone());

        match send_result {
            Ok(_) => {}
            Err(error::Error::NotConnected) => {
                self.client.connect()?;
                self.client.set_activity(activity)?;
            }
            Err(error::Error::IPCConnectionFailed) => {
                self.client.reconnect()?;
                self.client.set_activity(activity)?;
            }
            Err(error::Error::WriteError(_)) => {
                self.client.reconnect()?;
                self.client.set_activity(activity)?;
            }

            Err(e) => return Err(e.into()),
        }

        Ok(())
    }

    fn clear(&mut self) -> Result<(), PresenceError> {
        self.client
            .clear_activity()
            .or_else(|_| self.client.set_activity(activity::Activity::new()))?;

        Ok(())
    }

    fn close(&mut self) -> Result<(), PresenceError> {
        self.client.close()?;
        Ok(())
    }
}
