//! Available supported IP geolocation services.

mod error;
pub mod ipapi;
pub mod vore;

pub use error::Error;

use crate::address::Address;

use async_trait::async_trait;
use tracing::debug;

/// The network operator and the region of an IP.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Location {
    pub isp: String,
    pub region: String,
}

/// Each implementation facilitate to find out where an IP is located using a
/// specific geolocation service.
#[async_trait]
pub trait Locator: Send + Sync {
    /// The name of the service used in logs.
    fn name(&self) -> &str;

    async fn locate(&self, ip: &Address) -> Result<Location, Error>;
}

/// Asks `locators` in order and returns the location of the first one which
/// succeeds; `None` when all of them fail.
pub async fn locate(locators: &[Box<dyn Locator>], ip: &Address) -> Option<Location> {
    for l in locators {
        match l.locate(ip).await {
            Ok(loc) => return Some(loc),
            Err(e) => debug!(locator = l.name(), error = %e, "IP geolocation failed"),
        }
    }

    None
}

/// Joins the non-empty `parts` with a space.
fn join_non_empty(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::address::validate;
    use crate::error::ExternalService;

    struct Fixed(Option<&'static str>);

    #[async_trait]
    impl Locator for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn locate(&self, _: &Address) -> Result<Location, Error> {
            match self.0 {
                Some(isp) => Ok(Location {
                    isp: String::from(isp),
                    region: String::new(),
                }),
                None => Err(Error::Locator(ExternalService::Unspecified)),
            }
        }
    }

    #[tokio::test]
    async fn test_locate_first_success_wins() {
        let ip = validate("1.1.1.1").unwrap();
        let locators: Vec<Box<dyn Locator>> = vec![
            Box::new(Fixed(None)),
            Box::new(Fixed(Some("ISP A"))),
            Box::new(Fixed(Some("ISP B"))),
        ];

        let loc = locate(&locators, &ip).await.expect("a locator succeeds");
        assert_eq!(loc.isp, "ISP A");

        let failing: Vec<Box<dyn Locator>> = vec![Box::new(Fixed(None))];
        assert_eq!(locate(&failing, &ip).await, None);
        assert_eq!(locate(&[], &ip).await, None);
    }

    #[test]
    fn test_join_non_empty() {
        assert_eq!(join_non_empty(&["中国", " ", "广东", "深圳 "]), "中国 广东 深圳");
        assert_eq!(join_non_empty(&["", ""]), "");
    }
}
