//! Defines an error which any "provider" implementation must return.
//! The error type extends the [common error type](crate::error) to provide
//! kinds of errors to their specific domain.

use crate::error::{Error as ErrorCommon, ExternalService};

use std::error as stderr;
use std::fmt;

/// The error type to wrap the errors returned by the [providers and its
/// descendants modules](crate::providers).
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// Common error kinds which are shared across all the modules of this
    /// crate.
    Common(ErrorCommon),
    /// Identifies error returned by the provider.
    Provider(ExternalService),
    /// The provider doesn't have an A record for the domain.
    RecordNotFound { domain: String },
    /// The provider has rejected the update; `errors` contains the errors that
    /// it reported.
    Rejected { errors: String },
}

impl From<ErrorCommon> for Error {
    fn from(err: ErrorCommon) -> Self {
        Error::Common(err)
    }
}

impl From<ExternalService> for Error {
    fn from(err: ExternalService) -> Self {
        Error::Provider(err)
    }
}

impl stderr::Error for Error {
    fn source(&self) -> Option<&(dyn stderr::Error + 'static)> {
        match self {
            Error::Common(c) => c.source(),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Error::Common(c) => c.fmt(f),
            Error::Provider(p) => p.fmt(f),
            Error::RecordNotFound { domain } => write!(f, "A record of {} not found", domain),
            Error::Rejected { errors } => write!(f, "the update was rejected: {}", errors),
        }
    }
}
