//! Implementation for finding the public IP in a web page which shows it
//! somewhere in its content.

use super::{Error, Pick, PublicIpv4};
use crate::address::{self, Address};
use crate::client;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

/// The page used when none is configured.
pub const DEFAULT_URL: &str = "https://ip.164746.xyz/ipTop.html";

/// The public IP finder that scrapes a web page.
pub struct Finder {
    /// The URL of the page.
    url: String,
    /// How to choose the address when the page contains several.
    pick: Pick,
    /// The HTTP client that the instance use for making the requests.
    http_cli: isahc::HttpClient,
}

impl Finder {
    /// Creates a finder which scrapes the page located at `url`.
    pub fn new(url: &str, pick: Pick) -> Self {
        Self {
            url: String::from(url),
            pick,
            http_cli: client::build(),
        }
    }

    /// Returns all the dotted-quads present in `content` which are valid IPv4
    /// addresses, in the order that they appear. The second value is the last
    /// rejected dotted-quad, if any.
    fn candidates(content: &str) -> (Vec<Address>, Option<address::Invalid>) {
        lazy_static! {
            static ref RE: Regex = Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").unwrap();
        }

        let mut valid = Vec::new();
        let mut rejected = None;
        for m in RE.find_iter(content) {
            match address::validate(m.as_str()) {
                Ok(a) => valid.push(a),
                Err(invalid) => rejected = Some(invalid),
            }
        }

        (valid, rejected)
    }
}

#[async_trait]
impl PublicIpv4 for Finder {
    fn name(&self) -> &str {
        &self.url
    }

    async fn ipv4(&self) -> Result<Address, Error> {
        let mut response = self
            .http_cli
            .get_async(self.url.as_str())
            .await
            .map_err(crate::error::from_isahc::<Error>)?;

        client::check_status::<Error>("IP page", response.status())?;
        let body = client::body_text::<Error>(&mut response).await?;

        let (candidates, rejected) = Self::candidates(&body);
        match self.pick.choose(&candidates) {
            Some(a) => Ok(a.clone()),
            None => Err(Error::NoAddress {
                finder: self.url.clone(),
                rejected,
            }),
        }
    }
}
