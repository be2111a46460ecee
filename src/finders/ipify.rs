//! Implementation for using with "ipify" services.

use super::{Error, PublicIpv4};
use crate::address::{self, Address};
use crate::client;

use async_trait::async_trait;

/// The public IP finder for the "ipify" provider.
pub struct Finder {
    /// The API base URL to request the public IP V4.
    base_url: String,
    /// The HTTP client that the instance use for making the requests.
    http_cli: isahc::HttpClient,
}

impl Finder {
    /// Creates an "ipify" finder.
    pub fn new() -> Self {
        Self::with_base_url("https://api.ipify.org")
    }

    /// Creates an "ipify" finder using the specified base URL.
    /// This constructor is mainly useful for testing purposes.
    fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: String::from(base_url),
            http_cli: client::build(),
        }
    }
}

impl Default for Finder {
    fn default() -> Self {
        Finder::new()
    }
}

#[async_trait]
impl PublicIpv4 for Finder {
    fn name(&self) -> &str {
        "ipify"
    }

    /// Gets the IP V4 public IP where the machines is running behind.
    async fn ipv4(&self) -> Result<Address, Error> {
        let mut response = self
            .http_cli
            .get_async(self.base_url.as_str())
            .await
            .map_err(crate::error::from_isahc::<Error>)?;

        client::check_status::<Error>("ipify", response.status())?;
        let body = client::body_text::<Error>(&mut response).await?;

        address::validate(body.trim()).map_err(|invalid| Error::NoAddress {
            finder: String::from(self.name()),
            rejected: Some(invalid),
        })
    }
}
