//! Offer Windows

use std::fmt;

use jiff::Timestamp;
use thiserror::Error;

/// Seconds in a day, for remaining-day arithmetic.
const SECONDS_PER_DAY: i64 = 86_400;

/// Errors specific to offer window evaluation.
#[derive(Debug, Error, PartialEq)]
pub enum WindowError {
    /// The window ends on or before it starts.
    #[error("window end {end} must be after start {start}")]
    InvalidWindow {
        /// Scheduled start of the window.
        start: Timestamp,

        /// Scheduled end of the window.
        end: Timestamp,
    },
}

/// Scheduling window for an offer.
///
/// Both bounds are inclusive. The `enabled` switch is an operator control
/// and has no effect on how the window classifies against an instant; use
/// [`TimeWindow::is_active_at`] to combine the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// First instant the offer runs, inclusive.
    pub start: Timestamp,

    /// Last instant the offer runs, inclusive.
    pub end: Timestamp,

    /// Whether the offer is switched on at all.
    pub enabled: bool,
}

impl TimeWindow {
    /// Creates a window running from `start` to `end`, switched on.
    #[must_use]
    pub const fn new(start: Timestamp, end: Timestamp) -> Self {
        Self {
            start,
            end,
            enabled: true,
        }
    }

    /// Creates the same window, switched off.
    #[must_use]
    pub const fn disabled(start: Timestamp, end: Timestamp) -> Self {
        Self {
            start,
            end,
            enabled: false,
        }
    }

    /// Returns whether the offer is switched on and `now` falls inside the
    /// window.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::InvalidWindow`] if the window ends on or
    /// before it starts.
    pub fn is_active_at(&self, now: Timestamp) -> Result<bool, WindowError> {
        Ok(self.enabled && classify(self, now)? == OfferStatus::Current)
    }
}

/// Where an offer window sits relative to an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferStatus {
    /// The window has not opened yet.
    Upcoming,

    /// The instant falls inside the window.
    Current,

    /// The window has already closed.
    Expired,
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OfferStatus::Upcoming => "upcoming",
            OfferStatus::Current => "current",
            OfferStatus::Expired => "expired",
        };

        f.write_str(label)
    }
}

/// Classifies a window against an instant.
///
/// An offer is [`OfferStatus::Current`] from the first instant of `start`
/// through the last instant of `end`, inclusive at both ends. The window's
/// `enabled` switch does not change the classification.
///
/// # Errors
///
/// Returns [`WindowError::InvalidWindow`] if the window ends on or before
/// it starts.
pub fn classify(window: &TimeWindow, now: Timestamp) -> Result<OfferStatus, WindowError> {
    ensure_well_formed(window)?;

    if now < window.start {
        Ok(OfferStatus::Upcoming)
    } else if now > window.end {
        Ok(OfferStatus::Expired)
    } else {
        Ok(OfferStatus::Current)
    }
}

/// Whole days left before a window closes, seen from `now`.
///
/// Partial days round up, so a window closing in 36 hours reports two days.
/// Windows that are not current report zero; the result is never negative.
///
/// # Errors
///
/// Returns [`WindowError::InvalidWindow`] if the window ends on or before
/// it starts.
pub fn remaining_days(window: &TimeWindow, now: Timestamp) -> Result<i64, WindowError> {
    if classify(window, now)? != OfferStatus::Current {
        return Ok(0);
    }

    let seconds_left = window.end.as_second() - now.as_second();

    Ok((seconds_left + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY)
}

/// Return `InvalidWindow` unless the window ends after it starts.
fn ensure_well_formed(window: &TimeWindow) -> Result<(), WindowError> {
    if window.end <= window.start {
        Err(WindowError::InvalidWindow {
            start: window.start,
            end: window.end,
        })
    } else {
        Ok(())
    }
}
