//! Daily reset of the history and scheduling of the daily report.
//!
//! Every invocation first checks if a new day (reference clock) has begun; in
//! that case the history of the day that ended is kept aside in the state until
//! its report is sent, and the state is moved to the new day. The daily report
//! is due at hour 0 when it hasn't been sent for the current day, and it
//! summarizes the day that just ended, whichever invocation did the reset.

use crate::clock::{self, Clock};
use crate::history::DailyHistory;
use crate::report::{self, Report};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The persisted state of the daily rollover.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RolloverState {
    /// The day of the history; `None` before the first invocation.
    #[serde(default)]
    pub current_day: Option<NaiveDate>,
    /// The day for which the daily report was sent.
    #[serde(default)]
    pub report_sent_for_day: Option<NaiveDate>,
    /// The history of the day before `current_day` while its report is
    /// pending. It's dropped once hour 0 is over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_day: Option<DailyHistory>,
}

/// Decides when the history must be reset and when the daily report is due.
pub struct RolloverController<'a> {
    clock: &'a dyn Clock,
}

impl<'a> RolloverController<'a> {
    pub fn new(clock: &'a dyn Clock) -> Self {
        Self { clock }
    }

    /// Resets `history` and `state` when the current day differs from the
    /// state's day and returns `true` in that case. The history of the day
    /// that ended moves to [`RolloverState::ended_day`].
    pub fn check_rollover(&self, state: &mut RolloverState, history: &mut DailyHistory) -> bool {
        let today = clock::day_of(self.clock.now());
        if state.current_day == Some(today) {
            return false;
        }

        state.current_day = Some(today);
        state.report_sent_for_day = None;
        state.ended_day = Some(std::mem::take(history));
        true
    }

    /// Renders the report of the day that ended and marks it as sent for the
    /// current day when the report is due, otherwise it returns `None`.
    ///
    /// The report is due at hour 0 when it hasn't been sent for the state's
    /// day. Its subject is [`RolloverState::ended_day`], or `history` when
    /// the state doesn't keep one.
    /// [`Self::check_rollover`] must run before.
    pub fn take_due_report(
        &self,
        state: &mut RolloverState,
        history: &DailyHistory,
    ) -> Option<Report> {
        if clock::hour_of(self.clock.now()) != 0 {
            state.ended_day = None;
            return None;
        }

        let day = state.current_day?;
        if state.report_sent_for_day == Some(day) {
            return None;
        }

        state.report_sent_for_day = Some(day);
        let subject = state.ended_day.take();
        Some(report::render(&subject.as_ref().unwrap_or(history).aggregate()))
    }

    /// Runs the rollover check followed by the report check.
    pub fn advance(&self, state: &mut RolloverState, history: &mut DailyHistory) -> Advance {
        let rolled_over = self.check_rollover(state, history);
        let report = self.take_due_report(state, history);

        Advance {
            rolled_over,
            report,
        }
    }
}

/// The result of [`RolloverController::advance`].
#[derive(Debug)]
pub struct Advance {
    /// The history and the state have been reset for a new day.
    pub rolled_over: bool,
    /// The daily report which is due.
    pub report: Option<Report>,
}
