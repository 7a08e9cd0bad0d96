//! Delivery-date scheduling under the 9 AM cutoff rule.
//!
//! Orders placed at or after 9 AM local time are delivered from the next
//! day; before that, same-day delivery is still offered. The current time
//! is always an explicit parameter so cutoff and date-rollover behavior is
//! deterministic under test.
//!
//! The window is computed once at checkout-session start and frozen: a user
//! who starts checkout before 9 AM and lingers past it keeps the session's
//! original date list.

use chrono::{Days, NaiveDate, NaiveDateTime, Timelike};

/// Hour of day (local) after which same-day delivery is no longer offered.
pub const CUTOFF_HOUR: u32 = 9;

/// Number of delivery dates offered at checkout.
pub const OFFERED_DATE_COUNT: usize = 3;

/// The delivery dates a checkout session may offer, derived from a single
/// observation of the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryWindow {
    after_cutoff: bool,
    earliest: NaiveDate,
}

impl DeliveryWindow {
    /// Compute the window for the given local time.
    #[must_use]
    pub fn at(now: NaiveDateTime) -> Self {
        let after_cutoff = now.hour() >= CUTOFF_HOUR;
        let today = now.date();
        let earliest = if after_cutoff {
            // Calendar arithmetic, so month and year boundaries roll over
            // correctly.
            today.checked_add_days(Days::new(1)).unwrap_or(today)
        } else {
            today
        };
        Self {
            after_cutoff,
            earliest,
        }
    }

    /// Whether the session started at or after the cutoff hour (the "orders
    /// placed after 9 AM arrive tomorrow" notice).
    #[must_use]
    pub const fn after_cutoff(&self) -> bool {
        self.after_cutoff
    }

    /// The earliest offerable delivery date.
    #[must_use]
    pub const fn earliest(&self) -> NaiveDate {
        self.earliest
    }

    /// The `n` consecutive dates offered for selection, starting at the
    /// earliest. `NaiveDate` displays and serializes as ISO `YYYY-MM-DD`,
    /// which is also the value compared for selection equality.
    #[must_use]
    pub fn offerable_dates(&self, n: usize) -> Vec<NaiveDate> {
        (0u64..)
            .take(n)
            .filter_map(|i| self.earliest.checked_add_days(Days::new(i)))
            .collect()
    }
}
