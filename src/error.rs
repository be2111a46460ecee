//! Defines a common error type that exposes kinds of errors that any submodule
//! may return.
//! Every submodule which talks to an external service creates a specific error
//! type as a submodule of it to define the kinds of errors of its domain,
//! wrapping this one for the kinds that are shared across the crate.

use std::error as stderr;
use std::fmt;

use isahc::error::Error as IsahcError;

/// Convenient type for making more concise wrapping the standard error trait
/// object into a Box.
pub type BoxError = Box<dyn stderr::Error + Send + Sync>;

/// The error type that expose general kinds of errors that are common to all
/// the modules of this crate.
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// Identify unexpected errors which happen because of the state of the
    /// system where the application is running, for example, a state file that
    /// cannot be written, OS failures, etc.
    Internal(Internal),
    /// Identify errors due to invalid arguments passed to function or methods
    /// or assigned values to configurations.
    InvalidArguments(Args),
    /// Identify errors related with the network produced by the client or
    /// server side and informs to retry or not the operation.
    Network(Network),
}

impl Error {
    /// Convenient constructor for creating an InvalidArguments Error.
    /// See [`Args`] documentation to know about the convention for the value of
    /// the `names` parameter.
    pub(crate) fn invalid_arguments(names: &str, msg: &str) -> Self {
        Self::InvalidArguments(Args::new(names, msg))
    }

    /// Convenient constructor for creating a Network Error.
    pub(crate) fn network(origin: BoxError, side: NetworkSide, should_retry: bool) -> Self {
        Self::Network(Network {
            side,
            should_retry,
            inner: origin,
        })
    }

    /// Convenient constructor for creating an Internal Error.
    pub(crate) fn internal(ctx_msg: &str, error: BoxError) -> Self {
        Self::Internal(Internal {
            ctx_msg: String::from(ctx_msg),
            error,
        })
    }
}

impl stderr::Error for Error {
    fn source(&self) -> Option<&(dyn stderr::Error + 'static)> {
        match self {
            Error::InvalidArguments { .. } => None,
            Error::Internal(i) => i.source(),
            Error::Network(n) => n.source(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Error::InvalidArguments(a) => a.fmt(f),
            Error::Internal(i) => i.fmt(f),
            Error::Network(n) => n.fmt(f),
        }
    }
}

/// Represents invalid arguments error regarding the business domain.
#[derive(Debug)]
pub struct Args {
    /// `names` is one or several parameters names; it has several conventions
    /// for expressing the involved parameters.
    ///
    /// * When a specific parameter is invalid its value is the exact parameter
    ///   name.
    /// * When the parameter is a list (vector, array, etc.), the invalid items
    ///   can be __optionally__ indicated using square brackets (e.g. `l[3,5,7]`).
    /// * when the parameter is struct, the invalid fields can be
    ///   __optionally__ indicated using curly brackets (e.g `config{domain}`).
    /// * When several parameters are invalid, its value is the parameters names
    ///   wrapped in round brackets (e.g. `(p1,p3)`).
    /// * When all the function parameters are invalid, `<all>` is used.
    pub names: String,
    /// `msg` is a human friendly message that explains why the argument(s) are
    /// invalid.
    pub msg: String,
}

impl Args {
    pub(crate) fn new(names: &str, msg: &str) -> Self {
        Args {
            names: String::from(names),
            msg: String::from(msg),
        }
    }
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(
            f,
            "{} arguments have invalid values. {}",
            self.names, self.msg
        )
    }
}

/// An unexpected error which happens due to the state of the system where the
/// application is running; for example, insufficient resources, OS failure,
/// unreadable state files, etc.
#[derive(Debug)]
pub struct Internal {
    /// A human friendly message to provide context of the error.
    pub ctx_msg: String,
    /// The received error which cannot be handled by the application and get
    /// wrapped by this instance.
    pub(crate) error: BoxError,
}

impl stderr::Error for Internal {
    fn source(&self) -> Option<&(dyn stderr::Error + 'static)> {
        Some(self.error.as_ref())
    }
}

impl fmt::Display for Internal {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}: {}", self.ctx_msg, self.error)
    }
}

/// An error caused by the network when performing a requested operation.
#[derive(Debug)]
pub struct Network {
    pub side: NetworkSide,
    pub should_retry: bool,
    pub(crate) inner: BoxError,
}

impl stderr::Error for Network {
    fn source(&self) -> Option<&(dyn stderr::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        let retry = if self.should_retry { "yes" } else { "no" };
        write!(
            f,
            "Network error produced by the {} side (should retry operation: {}): {}",
            self.side, retry, self.inner,
        )
    }
}

/// Indicates the network side which originated the error.
#[derive(Debug, PartialEq)]
pub enum NetworkSide {
    /// Indicates that the error is in the client side.
    Client,
    /// Indicates that the error is in the server side.
    Server,
}

impl fmt::Display for NetworkSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            NetworkSide::Client => write!(f, "client"),
            NetworkSide::Server => write!(f, "server"),
        }
    }
}

/// An error reported by an external service (IP finder, DNS provider,
/// geolocation API, notification endpoint) when performing a requested
/// operation.
#[derive(Debug, PartialEq)]
pub enum ExternalService {
    /// Indicates that the service has returned an internal error.
    Internal { reason: String },
    /// Indicates that the service replied with something that this
    /// implementation doesn't know how to handle, usually because the service
    /// has changed its public API.
    Unexpected { reason: String },
    /// Indicates that the service has returned an errors which isn't currently
    /// specified in its API documentation.
    Unspecified,
}

impl fmt::Display for ExternalService {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            ExternalService::Internal { reason } => {
                write!(f, "service had an internal error: {}", reason)
            }
            ExternalService::Unexpected { reason } => {
                write!(f, "service replied unexpectedly: {}", reason)
            }
            ExternalService::Unspecified => write!(f, "service reported an unspecified error"),
        }
    }
}

/// Converts an error returned by the isahc HTTP client to the error type of
/// the module that made the request.
pub(crate) fn from_isahc<E>(err: IsahcError) -> E
where
    E: From<Error> + From<ExternalService>,
{
    use isahc::error::ErrorKind;

    let side = if err.is_client() {
        NetworkSide::Client
    } else {
        NetworkSide::Server
    };

    match err.kind() {
        ErrorKind::BadServerCertificate
        | ErrorKind::InvalidContentEncoding
        | ErrorKind::ProtocolViolation => E::from(ExternalService::Internal {
            reason: err.to_string(),
        }),
        ErrorKind::ConnectionFailed | ErrorKind::Timeout => {
            E::from(Error::network(err.into(), side, true))
        }
        ErrorKind::Io => {
            let should_retry = side == NetworkSide::Server;
            E::from(Error::network(err.into(), side, should_retry))
        }
        // A host name which cannot be resolved is reported as a server side
        // error, but it's always a misconfiguration of this side.
        ErrorKind::NameResolution => {
            E::from(Error::network(err.into(), NetworkSide::Client, false))
        }
        ErrorKind::BadClientCertificate
        | ErrorKind::ClientInitialization
        | ErrorKind::InvalidCredentials
        | ErrorKind::TlsEngine => E::from(Error::network(err.into(), side, false)),
        ErrorKind::InvalidRequest | ErrorKind::RequestBodyNotRewindable => {
            E::from(Error::internal("the HTTP request couldn't be sent", err.into()))
        }
        _ => E::from(ExternalService::Unexpected {
            reason: err.to_string(),
        }),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use std::error::Error as StdError;

    #[test]
    fn test_invalid_arguments_display() {
        let err = Error::invalid_arguments("config{domain}", "domain cannot be empty");
        assert_eq!(
            err.to_string(),
            "config{domain} arguments have invalid values. domain cannot be empty"
        );
        assert!(err.source().is_none(), "invalid arguments don't have a source");
    }

    #[test]
    fn test_internal_keeps_source() {
        let err = Error::internal("cannot read state", BoxError::from("permission denied"));
        assert_eq!(err.to_string(), "cannot read state: permission denied");
        assert_eq!(
            err.source().expect("internal errors have a source").to_string(),
            "permission denied"
        );
    }

    #[test]
    fn test_network_display() {
        let err = Error::network(BoxError::from("reset"), NetworkSide::Server, true);
        assert_eq!(
            err.to_string(),
            "Network error produced by the server side (should retry operation: yes): reset"
        );
    }
}
