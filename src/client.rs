//! HTTP client plumbing shared by the implementations of the external services.

use crate::error::{BoxError, Error as ErrorCommon, ExternalService, NetworkSide};

use std::time::Duration;

use isahc::config::Configurable;
use isahc::AsyncReadResponseExt;

/// Creates the HTTP client that every external service implementation uses.
pub(crate) fn build() -> isahc::HttpClient {
    isahc::HttpClientBuilder::new()
        .max_connections(2)
        .connection_cache_size(2)
        .connection_cache_ttl(Duration::from_secs(5))
        .timeout(Duration::from_secs(15))
        .build()
        .expect("HTTP client initialization error, this due to a bug in this crate, please report it")
}

/// Maps the HTTP status codes that aren't a success to errors.
/// `service` is the human friendly name of the service used in the messages.
pub(crate) fn check_status<E>(service: &str, status: http::StatusCode) -> Result<(), E>
where
    E: From<ErrorCommon> + From<ExternalService>,
{
    if status.is_success() {
        return Ok(());
    }

    if status.is_server_error() {
        return Err(E::from(ExternalService::Internal {
            reason: format!(
                r#"{} service has responded with an HTTP "{}" status code (expected 200)"#,
                service, status,
            ),
        }));
    }

    if status == http::StatusCode::BAD_REQUEST {
        return Err(E::from(ErrorCommon::network(
            BoxError::from(format!(
                r#"{} service has returned "400 Bad Request" HTTP status code"#,
                service
            )),
            NetworkSide::Client,
            false,
        )));
    }

    Err(E::from(ExternalService::Unexpected {
        reason: format!(
            r#"{} service has responded with an HTTP "{}" status code"#,
            service, status,
        ),
    }))
}

/// Reads the whole body of the response as text.
pub(crate) async fn body_text<E>(response: &mut isahc::Response<isahc::AsyncBody>) -> Result<String, E>
where
    E: From<ErrorCommon>,
{
    response.text().await.map_err(|err| {
        E::from(ErrorCommon::internal(
            "error while reading the response body as text",
            BoxError::from(err),
        ))
    })
}

/// Parses a JSON body; a body that doesn't match `T` means that the service
/// has changed its public API.
pub(crate) fn parse_json<T, E>(service: &str, body: &str) -> Result<T, E>
where
    T: serde::de::DeserializeOwned,
    E: From<ExternalService>,
{
    serde_json::from_str(body).map_err(|err| {
        E::from(ExternalService::Unexpected {
            reason: format!(
                r#"{} service has responded with an unexpected body ({}), got: "{}""#,
                service, err, body
            ),
        })
    })
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::finders::Error;

    #[test]
    fn test_check_status() {
        assert!(check_status::<Error>("ipify", http::StatusCode::OK).is_ok());
        assert!(check_status::<Error>("ipify", http::StatusCode::NO_CONTENT).is_ok());

        match check_status::<Error>("ipify", http::StatusCode::BAD_GATEWAY) {
            Err(Error::Finder(ExternalService::Internal { reason })) => assert_eq!(
                reason,
                r#"ipify service has responded with an HTTP "502 Bad Gateway" status code (expected 200)"#
            ),
            other => panic!("expected a service internal error, got {:?}", other),
        }

        match check_status::<Error>("ipify", http::StatusCode::BAD_REQUEST) {
            Err(Error::Common(ErrorCommon::Network(details))) => {
                assert_eq!(details.side, NetworkSide::Client, "network side");
                assert!(!details.should_retry, "should retry");
            }
            other => panic!("expected a network error, got {:?}", other),
        }

        match check_status::<Error>("ipify", http::StatusCode::MOVED_PERMANENTLY) {
            Err(Error::Finder(ExternalService::Unexpected { .. })) => {}
            other => panic!("expected an unexpected service error, got {:?}", other),
        }
    }
}
