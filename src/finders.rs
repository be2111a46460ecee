//! Available supported IP public finders.

mod error;
pub mod ipify;
pub mod page;

pub use error::Error;

use crate::address::Address;
use crate::error::Error as ErrorCommon;

use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

/// Each implementation facilitate to find out the public IP V4 of the machine
/// using a specific IP public finder service.
#[async_trait]
pub trait PublicIpv4: Send + Sync {
    /// The name of the finder used in logs.
    fn name(&self) -> &str;

    /// Gets the IP V4 public IP of the machine.
    async fn ipv4(&self) -> Result<Address, Error>;
}

/// Policy for choosing one address when a finder sees several valid ones.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pick {
    /// The first one in the order that they were found.
    First,
    /// Any of them with the same probability.
    Random,
}

impl Pick {
    /// Chooses one of `candidates`; `None` when it's empty.
    pub fn choose<'a>(&self, candidates: &'a [Address]) -> Option<&'a Address> {
        match self {
            Pick::First => candidates.first(),
            Pick::Random if candidates.is_empty() => None,
            Pick::Random => {
                let mut rng = SmallRng::from_entropy();
                candidates.get(rng.gen_range(0..candidates.len()))
            }
        }
    }
}

/// Asks `finders` in order and returns the address of the first one which
/// succeeds. When all of them fail it returns the error of the last one.
pub async fn discover(finders: &[Box<dyn PublicIpv4>]) -> Result<Address, Error> {
    let mut last_err = Error::Common(ErrorCommon::invalid_arguments(
        "finders",
        "at least one IP finder must be indicated",
    ));

    for f in finders {
        match f.ipv4().await {
            Ok(addr) => {
                debug!(finder = f.name(), address = %addr, "public IP found");
                return Ok(addr);
            }
            Err(e) => {
                warn!(finder = f.name(), error = %e, "IP finder failed");
                last_err = e;
            }
        }
    }

    Err(last_err)
}
