use async_trait::async_trait;

use crate::error::PresenceError;

/// A call-to-action button attached to a presence update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub url: String,
}

/// One presence update, keyed the way the presence service expects. `start`
/// is epoch seconds and is what produces the "elapsed" display downstream, so
/// it must stay fixed for the lifetime of one game run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityPayload {
    pub start: i64,
    pub details: Option<String>,
    pub state: Option<String>,
    pub large_image: Option<String>,
    pub large_text: Option<String>,
    pub small_image: Option<String>,
    pub small_text: Option<String>,
    pub buttons: Vec<Button>,
}

impl ActivityPayload {
    /// The bare update published the moment the game is detected, before any
    /// fields have been derived.
    pub fn starting(start: i64) -> Self {
        Self {
            start,
            ..Self::default()
        }
    }
}

/// Capability handle to the social-presence service (Discord in production,
/// a recorder in tests).
#[async_trait]
pub trait PresenceClient: Send {
    /// Name of the backing service, for logging.
    fn name(&self) -> &'static str;

    async fn connect(&mut self) -> Result<(), PresenceError>;

    async fn update(&mut self, payload: &ActivityPayload) -> Result<(), PresenceError>;

    async fn close(&mut self);
}
