//! Implementation for using with the vore.top IP data API.

use super::{join_non_empty, Error, Location, Locator};
use crate::address::Address;
use crate::client;
use crate::error::{BoxError, Error as ErrorCommon};

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

/// The geolocation service of vore.top.
pub struct Vore {
    /// The API base URL to use.
    base_url: String,
    /// The HTTP client that the instance use for making the requests.
    http_cli: isahc::HttpClient,
}

impl Vore {
    pub fn new() -> Self {
        Self::with_base_url("https://api.vore.top")
    }

    /// This constructor is mainly useful for testing purposes.
    fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: String::from(base_url.trim_end_matches('/')),
            http_cli: client::build(),
        }
    }
}

impl Default for Vore {
    fn default() -> Self {
        Vore::new()
    }
}

#[derive(Deserialize)]
struct Body {
    code: i64,
    ipdata: Option<IpData>,
}

#[derive(Deserialize)]
struct IpData {
    #[serde(default)]
    info1: String,
    #[serde(default)]
    info2: String,
    #[serde(default)]
    info3: String,
    #[serde(default)]
    isp: String,
}

#[async_trait]
impl Locator for Vore {
    fn name(&self) -> &str {
        "vore.top"
    }

    async fn locate(&self, ip: &Address) -> Result<Location, Error> {
        let url = Url::parse_with_params(
            &format!("{}/api/IPdata", self.base_url),
            &[("ip", ip.to_ipv4().to_string())],
        )
        .map_err(|e| {
            Error::Common(ErrorCommon::internal(
                "error while building the vore.top URL",
                BoxError::from(e),
            ))
        })?;

        let mut response = self
            .http_cli
            .get_async(url.as_str())
            .await
            .map_err(crate::error::from_isahc::<Error>)?;

        client::check_status::<Error>("vore.top", response.status())?;
        let body = client::body_text::<Error>(&mut response).await?;
        let body: Body = client::parse_json::<_, Error>("vore.top", &body)?;

        match body.ipdata {
            Some(d) if body.code == 200 => Ok(Location {
                isp: d.isp,
                region: join_non_empty(&[&d.info1, &d.info2, &d.info3]),
            }),
            _ => Err(Error::Unknown {
                reason: format!("vore.top replied with code {}", body.code),
            }),
        }
    }
}
