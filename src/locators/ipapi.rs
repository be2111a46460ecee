//! Implementation for using with the ip-api.com JSON API.

use super::{join_non_empty, Error, Location, Locator};
use crate::address::Address;
use crate::client;

use async_trait::async_trait;
use serde::Deserialize;

/// The geolocation service of ip-api.com.
pub struct IpApi {
    base_url: String,
    http_cli: isahc::HttpClient,
}

impl IpApi {
    pub fn new() -> Self {
        // The free endpoint is only served through plain HTTP.
        Self::with_base_url("http://ip-api.com")
    }

    fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: String::from(base_url.trim_end_matches('/')),
            http_cli: client::build(),
        }
    }
}

impl Default for IpApi {
    fn default() -> Self {
        IpApi::new()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Body {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    region_name: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    isp: String,
}

#[async_trait]
impl Locator for IpApi {
    fn name(&self) -> &str {
        "ip-api.com"
    }

    async fn locate(&self, ip: &Address) -> Result<Location, Error> {
        let url = format!("{}/json/{}?lang=zh-CN", self.base_url, ip.to_ipv4());
        let mut response = self
            .http_cli
            .get_async(url.as_str())
            .await
            .map_err(crate::error::from_isahc::<Error>)?;

        client::check_status::<Error>("ip-api.com", response.status())?;
        let body = client::body_text::<Error>(&mut response).await?;
        let body: Body = client::parse_json::<_, Error>("ip-api.com", &body)?;

        if body.status != "success" {
            return Err(Error::Unknown {
                reason: format!("ip-api.com replied with status {} ({})", body.status, body.message),
            });
        }

        Ok(Location {
            isp: body.isp,
            region: join_non_empty(&[&body.country, &body.region_name, &body.city]),
        })
    }
}
