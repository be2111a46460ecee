//! Available supported DNS providers.

pub mod cloudflare;
mod error;

pub use error::Error;

use crate::address::Address;

use async_trait::async_trait;

#[derive(Debug, PartialEq)]
pub struct Response {
    /// The identifier of the record in the provider.
    record_id: String,
}

impl Response {
    pub(crate) fn new(record_id: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
        }
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }
}

/// Each implementation facilitate updating the DNS A record of a domain for a
/// specific DNS provider.
#[async_trait]
pub trait ARecord: Send + Sync {
    /// The domain whose record is updated.
    fn domain(&self) -> &str;

    /// Update the A DNS record of the domain to `ip`.
    async fn update_record_a(&self, ip: &Address) -> Result<Response, Error>;
}
