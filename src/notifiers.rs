//! Available supported notification channels.

mod error;
mod message;
pub mod telegram;

pub use error::Error;
pub use message::Notification;

use async_trait::async_trait;

/// Each implementation delivers notifications through a specific channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// The name of the channel used in logs.
    fn name(&self) -> &str;

    async fn deliver(&self, notification: &Notification) -> Result<(), Error>;
}
