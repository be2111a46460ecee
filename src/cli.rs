//! Command-line interface.

use clap::{ArgEnum, Args, Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;
use std::vec::Vec;

/// Command-line tool for keeping the A record of a Cloudflare domain updated
/// with the public IPv4 of the machine that executes it, and for reporting the
/// changes of the day.
#[derive(Parser)]
#[clap(author, name = "cloudflare-ddns", version)]
pub struct App {
    /// Path of the configuration file.
    #[clap(short, long, default_value = "/etc/cloudflare-ddns/config.toml")]
    pub config: PathBuf,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scheduled invocation.
    ///
    /// It sends the daily report when it's due (hour 0 of UTC+8, once per day)
    /// and then it updates the DNS record if the public IP has changed.
    Run {
        #[clap(flatten)]
        discovery: Discovery,
    },
    /// Update the DNS record if the public IP has changed, without sending any
    /// notification.
    Update {
        #[clap(flatten)]
        discovery: Discovery,
    },
    /// Send the report of the day now and update the DNS record if the public
    /// IP has changed.
    Notify {
        #[clap(flatten)]
        discovery: Discovery,
    },
    /// Print the status of the last invocations.
    Status,
    /// Run the scheduled invocation periodically, one after the other.
    Daemon {
        /// Seconds between the start of two invocations.
        #[clap(short, long, default_value = "300")]
        interval: u64,

        #[clap(flatten)]
        discovery: Discovery,
    },
}

/// Options for finding the public IP; they override the configuration file.
#[derive(Args, Clone, Default)]
pub struct Discovery {
    /// Finders to use, in the order that they are tried until one of them
    /// replies with a valid IP.
    ///
    /// Supported finders: page, ipify.
    #[clap(short = 'f', long = "finder", arg_enum)]
    pub finder: Vec<Finder>,

    /// How to choose the IP when the page finder shows several.
    #[clap(long, arg_enum)]
    pub pick: Option<Pick>,
}

/// Supported finders.
#[derive(ArgEnum, Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Finder {
    /// Scrapes the configured web page.
    Page,
    /// The ipify API.
    Ipify,
}

/// Policies for choosing one of several IPs.
#[derive(ArgEnum, Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Pick {
    First,
    Random,
}

impl From<Pick> for crate::finders::Pick {
    fn from(p: Pick) -> Self {
        match p {
            Pick::First => crate::finders::Pick::First,
            Pick::Random => crate::finders::Pick::Random,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_run() {
        let app = App::try_parse_from(["cloudflare-ddns", "run"]).expect("valid arguments");
        assert_eq!(app.config, PathBuf::from("/etc/cloudflare-ddns/config.toml"));
        match app.command {
            Command::Run { discovery } => {
                assert!(discovery.finder.is_empty());
                assert_eq!(discovery.pick, None);
            }
            _ => panic!("expected the run command"),
        }
    }

    #[test]
    fn test_parse_discovery_overrides() {
        let app = App::try_parse_from([
            "cloudflare-ddns",
            "-c",
            "/tmp/ddns.toml",
            "update",
            "-f",
            "ipify",
            "--finder",
            "page",
            "--pick",
            "first",
        ])
        .expect("valid arguments");

        assert_eq!(app.config, PathBuf::from("/tmp/ddns.toml"));
        match app.command {
            Command::Update { discovery } => {
                assert_eq!(discovery.finder, vec![Finder::Ipify, Finder::Page]);
                assert_eq!(discovery.pick, Some(Pick::First));
            }
            _ => panic!("expected the update command"),
        }
    }

    #[test]
    fn test_parse_daemon() {
        let app = App::try_parse_from(["cloudflare-ddns", "daemon", "-i", "60"])
            .expect("valid arguments");
        match app.command {
            Command::Daemon { interval, .. } => assert_eq!(interval, 60),
            _ => panic!("expected the daemon command"),
        }
    }

    #[test]
    fn test_parse_invalid_finder() {
        assert!(App::try_parse_from(["cloudflare-ddns", "run", "-f", "duckduckgo"]).is_err());
        assert!(App::try_parse_from(["cloudflare-ddns"]).is_err(), "a command is required");
    }
}
