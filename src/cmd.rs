//! Commands and the collaborators that they share.

pub mod status;
pub mod update;

use crate::cli;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::finders::{self, PublicIpv4};
use crate::locators::{self, Locator};
use crate::notifiers::{telegram, Notifier};
use crate::providers::{cloudflare, ARecord};
use crate::store::{FileStore, Store};

use anyhow::{Context as _, Result};

/// The collaborators of an invocation.
pub struct Context {
    pub clock: Box<dyn Clock>,
    pub store: Box<dyn Store>,
    /// Tried in order until one finds the public IP.
    pub finders: Vec<Box<dyn PublicIpv4>>,
    pub provider: Box<dyn ARecord>,
    /// `None` when the notifications are disabled.
    pub notifier: Option<Box<dyn Notifier>>,
    /// Tried in order until one locates the IP.
    pub locators: Vec<Box<dyn Locator>>,
}

impl Context {
    /// Builds the collaborators from the configuration; the discovery options
    /// of the command line take precedence over the file.
    pub fn from_config(config: &Config, discovery: &cli::Discovery) -> Result<Self> {
        let pick = discovery.pick.unwrap_or(config.discovery.pick);
        let kinds = if discovery.finder.is_empty() {
            &config.discovery.finders
        } else {
            &discovery.finder
        };

        let mut finders_to_use: Vec<Box<dyn PublicIpv4>> = Vec::with_capacity(kinds.len());
        let mut seen = Vec::with_capacity(kinds.len());
        for k in kinds {
            if seen.contains(k) {
                continue;
            }
            seen.push(*k);

            match k {
                cli::Finder::Page => finders_to_use.push(Box::new(finders::page::Finder::new(
                    &config.discovery.page_url,
                    pick.into(),
                ))),
                cli::Finder::Ipify => finders_to_use.push(Box::new(finders::ipify::Finder::new())),
            }
        }

        let provider = cloudflare::Updater::new(
            &config.cloudflare.zone_id,
            config.api_token(),
            &config.cloudflare.domain,
            config.cloudflare.ttl,
        )
        .context("Invalid Cloudflare configuration")?;

        let notifier = config
            .telegram
            .credentials()
            .map(|(token, chat)| Box::new(telegram::Bot::new(token, chat)) as Box<dyn Notifier>);

        let locators_to_use: Vec<Box<dyn Locator>> = vec![
            Box::new(locators::vore::Vore::new()),
            Box::new(locators::ipapi::IpApi::new()),
        ];

        Ok(Self {
            clock: Box::new(SystemClock),
            store: Box::new(FileStore::new(&config.state.dir)),
            finders: finders_to_use,
            provider: Box::new(provider),
            notifier,
            locators: locators_to_use,
        })
    }
}
