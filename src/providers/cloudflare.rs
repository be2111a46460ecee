//! Implementation for using with the Cloudflare DNS API.

use super::error::Error;
use super::{ARecord, Response};
use crate::address::Address;
use crate::client;
use crate::error::{BoxError, Error as ErrorCommon};

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// The TTL of the record when none is configured.
pub const DEFAULT_TTL: u32 = 120;

/// The DNS updater for the Cloudflare provider.
pub struct Updater {
    /// The identifier of the zone which contains the record.
    zone_id: String,
    /// The authorization API token.
    token: String,
    /// The domain of the A record.
    domain: String,
    /// The TTL set to the record on each update.
    ttl: u32,
    /// The API base URL to use.
    base_url: String,
    /// The HTTP client that the instance use for making the requests.
    http_cli: isahc::HttpClient,
}

impl Updater {
    /// Creates a Cloudflare updater for the A record of `domain` in the zone
    /// `zone_id`.
    /// An `Error::InvalidArguments` is returned when any of them is empty or
    /// `domain` isn't a valid domain name.
    pub fn new(zone_id: &str, token: &str, domain: &str, ttl: u32) -> Result<Self, Error> {
        Self::with_base_url(
            zone_id,
            token,
            domain,
            ttl,
            "https://api.cloudflare.com/client/v4",
        )
    }

    /// Creates a Cloudflare updater using the specified base URL.
    /// This constructor is mainly useful for testing purposes.
    fn with_base_url(
        zone_id: &str,
        token: &str,
        domain: &str,
        ttl: u32,
        base_url: &str,
    ) -> Result<Self, Error> {
        if zone_id.is_empty() {
            return Err(Error::Common(ErrorCommon::invalid_arguments(
                "zone_id",
                "the zone identifier cannot be empty",
            )));
        }

        if token.is_empty() {
            return Err(Error::Common(ErrorCommon::invalid_arguments(
                "token",
                "the API token cannot be empty",
            )));
        }

        Self::validate_domain(domain)?;

        Ok(Updater {
            zone_id: String::from(zone_id),
            token: String::from(token),
            domain: String::from(domain),
            ttl,
            base_url: String::from(base_url.trim_end_matches('/')),
            http_cli: client::build(),
        })
    }

    /// Check if domain is a valid domain name: dot separated labels which can
    /// only contain letters (A-Z), numbers (0-9), and dashes (-), case
    /// insensitive.
    fn validate_domain(domain: &str) -> Result<(), Error> {
        lazy_static! {
            static ref RE: Regex =
                Regex::new(r"(?i)^[a-z0-9]([a-z0-9\-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9\-]*[a-z0-9])?)*$")
                    .unwrap();
        }

        if !RE.is_match(domain) {
            return Err(Error::Common(ErrorCommon::invalid_arguments(
                "domain",
                "a domain name can only contain dot separated labels of 'a-z', '0-9' and '-' case insensitive characters",
            )));
        }

        Ok(())
    }

    /// Finds the identifier of the A record of the domain.
    async fn find_record_id(&self) -> Result<String, Error> {
        let url = Url::parse_with_params(
            &format!("{}/zones/{}/dns_records", self.base_url, self.zone_id),
            &[("type", "A"), ("name", self.domain.as_str())],
        )
        .map_err(|e| {
            Error::Common(ErrorCommon::internal(
                "error while building the DNS records URL",
                BoxError::from(e),
            ))
        })?;

        let request = http::Request::get(url.as_str())
            .header("Authorization", format!("Bearer {}", self.token))
            .body(())
            .map_err(|e| {
                Error::Common(ErrorCommon::internal(
                    "error while building the DNS records request",
                    BoxError::from(e),
                ))
            })?;

        let list: Envelope<Vec<Record>> = self.send(request).await?;
        match list.result.and_then(|records| records.into_iter().next()) {
            Some(r) => Ok(r.id),
            None => Err(Error::RecordNotFound {
                domain: self.domain.clone(),
            }),
        }
    }

    /// Sends `request` and parses the Cloudflare response envelope. An envelope
    /// which isn't successful is returned as a `Error::Rejected`.
    async fn send<B, T>(&self, request: http::Request<B>) -> Result<Envelope<T>, Error>
    where
        B: Into<isahc::AsyncBody>,
        T: serde::de::DeserializeOwned,
    {
        let mut response = self
            .http_cli
            .send_async(request)
            .await
            .map_err(crate::error::from_isahc::<Error>)?;

        // Cloudflare reports client errors (e.g. an invalid token) in the
        // envelope, only server errors are mapped by the status.
        if response.status().is_server_error() {
            client::check_status::<Error>("Cloudflare", response.status())?;
        }

        let body = client::body_text::<Error>(&mut response).await?;
        let envelope: Envelope<T> = client::parse_json::<_, Error>("Cloudflare", &body)?;
        if !envelope.success {
            return Err(Error::Rejected {
                errors: envelope.errors.to_string(),
            });
        }

        Ok(envelope)
    }
}

#[async_trait]
impl ARecord for Updater {
    fn domain(&self) -> &str {
        &self.domain
    }

    async fn update_record_a(&self, ip: &Address) -> Result<Response, Error> {
        let record_id = self.find_record_id().await?;
        debug!(record_id = %record_id, domain = %self.domain, "A record found");

        let body = serde_json::json!({
            "type": "A",
            "name": self.domain,
            "content": ip.to_ipv4().to_string(),
            "ttl": self.ttl,
        });

        let request = http::Request::put(format!(
            "{}/zones/{}/dns_records/{}",
            self.base_url, self.zone_id, record_id
        ))
        .header("Authorization", format!("Bearer {}", self.token))
        .header("Content-Type", "application/json")
        .body(body.to_string())
        .map_err(|e| {
            Error::Common(ErrorCommon::internal(
                "error while building the DNS record update request",
                BoxError::from(e),
            ))
        })?;

        let _: Envelope<serde_json::Value> = self.send(request).await?;
        Ok(Response::new(record_id))
    }
}

/// The envelope of every Cloudflare API response.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    errors: serde_json::Value,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct Record {
    id: String,
}
