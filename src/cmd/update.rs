//! Update command: one invocation of the synchronization job.

use super::Context;
use crate::error::Error as ErrorCommon;
use crate::finders;
use crate::history::Observation;
use crate::locators;
use crate::notifiers::Notification;
use crate::report::{self, Report};
use crate::rollover::RolloverController;

use std::fmt;

use tracing::{error, info, warn};

/// What started the invocation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Trigger {
    /// The periodic invocation; it sends the daily report when it's due.
    Scheduled,
    /// Update only; nothing is notified.
    Update,
    /// Sends the report of the day right away.
    Notify,
}

/// How the invocation ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    /// The public IP is the one of the last update.
    Unchanged,
    /// The DNS record has been updated to a new IP.
    Updated,
    /// The public IP couldn't be found.
    DiscoveryFailed,
    /// The DNS record couldn't be updated.
    UpdateFailed,
    /// Something unexpected failed, e.g. the state couldn't be saved.
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        let text = match self {
            Outcome::Unchanged => "IP 未变化",
            Outcome::Updated => "更新完成",
            Outcome::DiscoveryFailed => "IP 获取失败",
            Outcome::UpdateFailed => "DNS 更新失败",
            Outcome::Failed => "异常",
        };

        f.write_str(text)
    }
}

/// Runs one invocation. Every failure ends up in the returned outcome and, if
/// the trigger allows it, in a notification.
pub async fn execute(ctx: &Context, trigger: Trigger) -> Outcome {
    match run(ctx, trigger).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "invocation failed");
            let n = Notification::Failed {
                domain: String::from(ctx.provider.domain()),
                reason: e.to_string(),
                time: ctx.clock.now_local(),
            };
            notify(ctx, trigger, &n).await;
            Outcome::Failed
        }
    }
}

async fn run(ctx: &Context, trigger: Trigger) -> Result<Outcome, ErrorCommon> {
    if let Some(report) = roll_over(ctx, trigger)? {
        send_report(ctx, trigger, report).await?;
    }

    let address = match finders::discover(&ctx.finders).await {
        Ok(a) => a,
        Err(e) => {
            warn!(error = %e, "public IP not found");
            let n = Notification::DiscoveryFailed {
                domain: String::from(ctx.provider.domain()),
                reason: e.to_string(),
                time: ctx.clock.now_local(),
            };
            notify(ctx, trigger, &n).await;
            return Ok(Outcome::DiscoveryFailed);
        }
    };

    let last = ctx.store.load_last_address()?;
    if last.as_ref() == Some(&address) {
        info!(address = %address, "IP unchanged");
        return Ok(Outcome::Unchanged);
    }

    let response = match ctx.provider.update_record_a(&address).await {
        Ok(r) => r,
        Err(e) => {
            warn!(address = %address, error = %e, "DNS record update failed");
            let n = Notification::Failed {
                domain: String::from(ctx.provider.domain()),
                reason: e.to_string(),
                time: ctx.clock.now_local(),
            };
            notify(ctx, trigger, &n).await;
            return Ok(Outcome::UpdateFailed);
        }
    };

    ctx.store.save_last_address(&address)?;
    let mut history = ctx.store.load_history()?;
    history.push(Observation {
        address: address.clone(),
        timestamp: ctx.clock.now_local(),
    });
    ctx.store.save_history(&history)?;

    info!(
        domain = ctx.provider.domain(),
        address = %address,
        record = response.record_id(),
        previous = ?last.as_ref().map(|a| a.as_str()),
        "DNS record updated"
    );
    Ok(Outcome::Updated)
}

/// Applies the daily rollover and returns the report that must be sent.
/// The state is saved before the report is delivered, so a report is never
/// sent twice for the same day.
fn roll_over(ctx: &Context, trigger: Trigger) -> Result<Option<Report>, ErrorCommon> {
    let mut state = ctx.store.load_rollover()?;
    let mut history = ctx.store.load_history()?;
    let before = state.clone();
    let controller = RolloverController::new(ctx.clock.as_ref());

    let (rolled_over, report) = match trigger {
        Trigger::Update => (controller.check_rollover(&mut state, &mut history), None),
        Trigger::Scheduled => {
            let a = controller.advance(&mut state, &mut history);
            (a.rolled_over, a.report)
        }
        Trigger::Notify => {
            let a = controller.advance(&mut state, &mut history);
            let forced = a
                .report
                .unwrap_or_else(|| report::render(&history.aggregate()));
            (a.rolled_over, Some(forced))
        }
    };

    if rolled_over {
        info!(day = ?state.current_day, "new day, history cleared");
    }
    if state != before {
        ctx.store.save_history(&history)?;
        ctx.store.save_rollover(&state)?;
    }

    Ok(report)
}

async fn send_report(ctx: &Context, trigger: Trigger, report: Report) -> Result<(), ErrorCommon> {
    let address = ctx.store.load_last_address()?;
    let location = match &address {
        Some(a) if ctx.notifier.is_some() => locators::locate(&ctx.locators, a).await,
        _ => None,
    };

    let n = Notification::DailyReport {
        domain: String::from(ctx.provider.domain()),
        report,
        address,
        location,
        time: ctx.clock.now_local(),
    };
    notify(ctx, trigger, &n).await;
    Ok(())
}

/// Delivers `notification` if the trigger allows it and there is a notifier.
/// Delivery failures are only logged.
async fn notify(ctx: &Context, trigger: Trigger, notification: &Notification) {
    if trigger == Trigger::Update {
        return;
    }

    let notifier = match &ctx.notifier {
        Some(n) => n,
        None => return,
    };

    match notifier.deliver(notification).await {
        Ok(()) => info!(notifier = notifier.name(), "notification delivered"),
        Err(e) => warn!(notifier = notifier.name(), error = %e, "notification not delivered"),
    }
}
