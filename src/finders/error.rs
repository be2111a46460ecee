//! Defines an error which any "finders" implementation must return.
//! The error type extends the [common error type](crate::error) to provide
//! kinds of errors to their specific domain.

use crate::address::Invalid;
use crate::error::{Error as ErrorCommon, ExternalService};

use std::error as stderr;
use std::fmt;

/// The error type to wrap the errors returned by the [finders and its
/// descendants modules](crate::finders).
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// Common error kinds which are shared across all the modules of this
    /// crate.
    Common(ErrorCommon),
    /// Identifies error returned by the finder.
    Finder(ExternalService),
    /// The finder replied but it didn't contain any valid IPv4 address.
    NoAddress {
        /// The name of the finder.
        finder: String,
        /// The last rejected candidate, if any.
        rejected: Option<Invalid>,
    },
}

impl From<ErrorCommon> for Error {
    fn from(err: ErrorCommon) -> Self {
        Error::Common(err)
    }
}

impl From<ExternalService> for Error {
    fn from(err: ExternalService) -> Self {
        Error::Finder(err)
    }
}

impl stderr::Error for Error {
    fn source(&self) -> Option<&(dyn stderr::Error + 'static)> {
        match self {
            Error::Common(c) => c.source(),
            Error::Finder(_) => None,
            Error::NoAddress { rejected, .. } => {
                rejected.as_ref().map(|r| r as &(dyn stderr::Error + 'static))
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Error::Common(c) => c.fmt(f),
            Error::Finder(es) => es.fmt(f),
            Error::NoAddress {
                finder,
                rejected: None,
            } => write!(f, "{} replied without any IPv4 address", finder),
            Error::NoAddress {
                finder,
                rejected: Some(r),
            } => write!(f, "{} replied without any valid IPv4 address ({})", finder, r),
        }
    }
}
