mod client;
mod discord;
mod session;

pub use client::{ActivityPayload, Button, PresenceClient};
pub use discord::DiscordClient;
pub use session::{PresenceSession, SessionConfig, Timing};
