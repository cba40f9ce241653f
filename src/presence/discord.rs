use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use discord_sdk as ds;

use super::client::{ActivityPayload, PresenceClient};
use crate::error::PresenceError;

/// Discord-backed presence client. Each [`connect`](PresenceClient::connect)
/// performs the full IPC handshake against a locally running Discord client
/// and fails fast when none is reachable, so the session can drive its own
/// retry cadence.
pub struct DiscordClient {
    app_id: i64,
    discord: Option<ds::Discord>,
}

impl DiscordClient {
    pub fn new(app_id: i64) -> Self {
        Self {
            app_id,
            discord: None,
        }
    }
}

#[async_trait]
impl PresenceClient for DiscordClient {
    fn name(&self) -> &'static str {
        "Discord"
    }

    async fn connect(&mut self) -> Result<(), PresenceError> {
        let (wheel, handler) = ds::wheel::Wheel::new(Box::new(|err| {
            tracing::warn!("Discord event error: {err}");
        }));

        let mut user = wheel.user();

        let discord = ds::Discord::new(
            ds::DiscordApp::PlainId(self.app_id),
            ds::Subscriptions::ACTIVITY,
            Box::new(handler),
        )
        .map_err(|e| PresenceError::ConnectFailed(e.to_string()))?;

        user.0
            .changed()
            .await
            .map_err(|e| PresenceError::ConnectFailed(e.to_string()))?;

        match &*user.0.borrow() {
            ds::wheel::UserState::Connected(user) => {
                tracing::info!("Connected to Discord as {}", user.username);
            }
            ds::wheel::UserState::Disconnected(e) => {
                return Err(PresenceError::ConnectFailed(e.to_string()));
            }
        }

        self.discord = Some(discord);
        Ok(())
    }

    async fn update(&mut self, payload: &ActivityPayload) -> Result<(), PresenceError> {
        let discord = self.discord.as_ref().ok_or(PresenceError::NotConnected)?;

        let start =
            SystemTime::UNIX_EPOCH + Duration::from_secs(u64::try_from(payload.start).unwrap_or(0));
        let mut activity = ds::activity::ActivityBuilder::default().start_timestamp(start);

        if let Some(details) = payload.details.clone() {
            activity = activity.details(details);
        }
        if let Some(state) = payload.state.clone() {
            activity = activity.state(state);
        }

        let mut assets = ds::activity::Assets::default();
        if let Some(key) = payload.large_image.clone() {
            assets = assets.large(key, payload.large_text.clone());
        }
        if let Some(key) = payload.small_image.clone() {
            assets = assets.small(key, payload.small_text.clone());
        }
        activity = activity.assets(assets);

        for button in &payload.buttons {
            activity = activity.button(ds::activity::Button {
                label: button.label.clone(),
                url: button.url.clone(),
            });
        }

        discord
            .update_activity(activity)
            .await
            .map_err(|e| PresenceError::UpdateFailed(e.to_string()))?;

        Ok(())
    }

    async fn close(&mut self) {
        if let Some(discord) = self.discord.take() {
            discord.disconnect().await;
        }
    }
}
