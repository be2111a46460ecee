//! Defines an error which any "notifiers" implementation must return.
//! The error type extends the [common error type](crate::error) to provide
//! kinds of errors to their specific domain.

use crate::error::{Error as ErrorCommon, ExternalService};

use std::error as stderr;
use std::fmt;

/// The error type to wrap the errors returned by the [notifiers and its
/// descendants modules](crate::notifiers).
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// Common error kinds which are shared across all the modules of this
    /// crate.
    Common(ErrorCommon),
    /// Identifies error returned by the notification service.
    Notifier(ExternalService),
    /// The service refused to deliver the notification.
    Refused { description: String },
}

impl From<ErrorCommon> for Error {
    fn from(err: ErrorCommon) -> Self {
        Error::Common(err)
    }
}

impl From<ExternalService> for Error {
    fn from(err: ExternalService) -> Self {
        Error::Notifier(err)
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
            Error::Notifier(es) => es.fmt(f),
            Error::Refused { description } => {
                write!(f, "the notification was refused: {}", description)
            }
        }
    }
}
