//! Validation of the IPv4 addresses that the public IP finders report.

use std::error as stderr;
use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// An IPv4 address in dotted-quad notation which has been accepted by
/// [`validate`].
///
/// The text is kept as it was found, so two addresses are equal only when
/// their text is equal (e.g. `01.2.3.4` and `1.2.3.4` are different values
/// which point to the same IP).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// The address as it was validated.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric value of the address.
    pub fn to_ipv4(&self) -> Ipv4Addr {
        let mut octets = [0u8; 4];
        for (o, g) in octets.iter_mut().zip(self.0.split('.')) {
            // Groups were checked by `validate`, a group that doesn't parse
            // can only come from a state file edited by hand.
            *o = g.parse().unwrap_or_default();
        }

        Ipv4Addr::from(octets)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        f.write_str(&self.0)
    }
}

impl From<Ipv4Addr> for Address {
    fn from(ip: Ipv4Addr) -> Self {
        Address(ip.to_string())
    }
}

/// Validates that `candidate` is an IPv4 address in dotted-quad notation:
/// exactly four groups separated by `.`, each one a base-10 number in the range
/// `[0, 255]` without sign. Leading zeros are accepted.
pub fn validate(candidate: &str) -> Result<Address, Invalid> {
    let groups: Vec<&str> = candidate.split('.').collect();
    if groups.len() != 4 {
        return Err(Invalid::new(candidate, Reason::GroupCount(groups.len())));
    }

    for (index, group) in groups.iter().enumerate() {
        if group.is_empty() || !group.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Invalid::new(candidate, Reason::NotNumeric { index }));
        }

        // Only digits at this point, so the parse can only fail on overflow.
        if group.parse::<u8>().is_err() {
            return Err(Invalid::new(candidate, Reason::OutOfRange { index }));
        }
    }

    Ok(Address(String::from(candidate)))
}

/// The failure returned by [`validate`] for candidates that aren't IPv4
/// addresses.
#[derive(Debug, PartialEq)]
pub struct Invalid {
    /// The rejected candidate.
    pub candidate: String,
    /// Why it was rejected.
    pub reason: Reason,
}

impl Invalid {
    fn new(candidate: &str, reason: Reason) -> Self {
        Invalid {
            candidate: String::from(candidate),
            reason,
        }
    }
}

impl stderr::Error for Invalid {}

impl fmt::Display for Invalid {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, r#""{}" isn't a valid IPv4 address: {}"#, self.candidate, self.reason)
    }
}

/// The reasons for rejecting an IPv4 candidate.
#[derive(Debug, PartialEq)]
pub enum Reason {
    /// The candidate doesn't have four groups; it holds the number of groups
    /// found.
    GroupCount(usize),
    /// The group at `index` isn't a non-negative base-10 number.
    NotNumeric { index: usize },
    /// The group at `index` is greater than 255.
    OutOfRange { index: usize },
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Reason::GroupCount(n) => write!(f, "expected 4 groups, found {}", n),
            Reason::NotNumeric { index } => write!(f, "group {} isn't a number", index + 1),
            Reason::OutOfRange { index } => {
                write!(f, "group {} is out of the range 0-255", index + 1)
            }
        }
    }
}
