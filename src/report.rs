//! Offer Board
//!
//! Renders the back-office offer list as a terminal table: one row per
//! offer with its window, status badge, remaining days and savings, plus a
//! short summary block. This is a preview for humans at a prompt, not a UI.

use std::{fmt::Write, io};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use slotmap::SlotMap;
use smallvec::{SmallVec, smallvec};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use jiff::Timestamp;

use crate::{
    bundles::{BundleError, evaluate_bundle},
    offers::{Offer, OfferKey, OfferMeta},
    windows::{OfferStatus, WindowError, classify, remaining_days},
};

/// Errors that can occur when rendering an offer board.
#[derive(Debug, Error)]
pub enum BoardError {
    /// An offer carries a window that ends on or before it starts.
    #[error(transparent)]
    Window(#[from] WindowError),

    /// Bundle evaluation failed.
    #[error(transparent)]
    Bundle(#[from] BundleError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// A rendering of a set of offers as seen from one instant.
///
/// The instant is explicit so boards are deterministic; nothing here reads
/// the ambient clock.
#[derive(Debug, Clone, Copy)]
pub struct OfferBoard {
    now: Timestamp,
}

impl OfferBoard {
    /// Creates a board that evaluates offers as of `now`.
    #[must_use]
    pub const fn at(now: Timestamp) -> Self {
        Self { now }
    }

    /// Returns the instant the board evaluates against.
    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Renders the offers as a table followed by a summary block.
    ///
    /// # Errors
    ///
    /// Returns a [`BoardError`] if an offer's window is invalid, a bundle
    /// cannot be evaluated, or the output cannot be written.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        offers: &[Offer<'_>],
        offer_meta: &SlotMap<OfferKey, OfferMeta>,
    ) -> Result<(), BoardError> {
        let mut builder = Builder::default();

        builder.push_record(["Offer", "Kind", "Window", "Status", "Days Left", "Was", "Now", "Savings"]);

        let mut color_ops: SmallVec<[(usize, usize, Color); 16]> = smallvec![];
        let mut summary = BoardSummary::default();

        for (row, offer) in offers.iter().enumerate() {
            let cells = offer_cells(offer, offer_meta, self.now)?;

            summary.absorb(&cells);

            builder.push_record([
                cells.name,
                cells.kind.to_string(),
                cells.window,
                cells.status_label,
                cells.days_left,
                cells.was,
                cells.now,
                cells.savings,
            ]);

            color_ops.push((row + 1, 3, status_color(cells.status, cells.enabled)));
        }

        write_board_table(&mut out, builder, color_ops)?;

        summary.write_to(&mut out)?;

        Ok(())
    }
}

/// Cell contents for a single offer row.
struct OfferCells<'a> {
    name: String,
    kind: &'static str,
    window: String,
    status: OfferStatus,
    status_label: String,
    enabled: bool,
    days_left: String,
    was: String,
    now: String,
    savings: String,
    live_savings: Option<Money<'a, Currency>>,
}

/// Build the cell contents for one offer row.
fn offer_cells<'a>(
    offer: &Offer<'a>,
    offer_meta: &SlotMap<OfferKey, OfferMeta>,
    now: Timestamp,
) -> Result<OfferCells<'a>, BoardError> {
    let name = offer_meta
        .get(offer.key())
        .map_or("<unknown>", |meta| meta.name.as_str())
        .to_string();

    let window = offer.window();
    let status = classify(window, now)?;
    let days_left = remaining_days(window, now)?;
    let active = window.enabled && status == OfferStatus::Current;

    let (kind, was, offer_price, savings, savings_percent) = match offer {
        Offer::Bundle(bundle) => {
            let evaluation = evaluate_bundle(bundle.quote())?;

            (
                "bundle",
                evaluation.original_total,
                *bundle.quote().bundle_price(),
                evaluation.savings,
                evaluation.savings_percent,
            )
        }
        Offer::Special(special) => (
            "special",
            *special.regular(),
            *special.special(),
            special.savings()?,
            special.savings_percent()?,
        ),
    };

    let status_label = if window.enabled {
        status.to_string()
    } else {
        format!("{status} (disabled)")
    };

    Ok(OfferCells {
        name,
        kind,
        window: format!(
            "{} to {}",
            window.start.strftime("%Y-%m-%d"),
            window.end.strftime("%Y-%m-%d")
        ),
        status,
        status_label,
        enabled: window.enabled,
        days_left: if days_left > 0 {
            days_left.to_string()
        } else {
            String::new()
        },
        was: format!("{was}"),
        now: format!("{offer_price}"),
        savings: format!("({}%) {savings}", percent_points(savings_percent)),
        live_savings: active.then_some(savings),
    })
}

/// Running totals for the block under the table.
#[derive(Debug, Default)]
struct BoardSummary<'a> {
    offers: usize,
    live: usize,
    upcoming: usize,
    expired: usize,
    live_savings_minor: i64,
    currency: Option<&'a Currency>,
}

impl<'a> BoardSummary<'a> {
    fn absorb(&mut self, cells: &OfferCells<'a>) {
        self.offers += 1;

        match cells.status {
            OfferStatus::Upcoming => self.upcoming += 1,
            OfferStatus::Expired => self.expired += 1,
            OfferStatus::Current => {}
        }

        if let Some(savings) = cells.live_savings {
            self.live += 1;
            self.live_savings_minor += savings.to_minor_units();
            self.currency = Some(savings.currency());
        }
    }

    fn write_to(&self, out: &mut impl io::Write) -> Result<(), BoardError> {
        writeln!(
            out,
            " Offers: {}  (live: {}, upcoming: {}, expired: {})",
            self.offers, self.live, self.upcoming, self.expired
        )
        .map_err(|_err| BoardError::IO)?;

        if let Some(currency) = self.currency {
            writeln!(
                out,
                " Live savings: {}",
                Money::from_minor(self.live_savings_minor, currency)
            )
            .map_err(|_err| BoardError::IO)?;
        }

        writeln!(out).map_err(|_err| BoardError::IO)
    }
}

fn write_board_table(
    out: &mut impl io::Write,
    builder: Builder,
    color_ops: SmallVec<[(usize, usize, Color); 16]>,
) -> Result<(), BoardError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(4..8), Alignment::right());

    for (row, col, color) in color_ops {
        table.modify((row, col), color);
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| BoardError::IO)
}

/// Converts a fractional percentage to percent points for display.
fn percent_points(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.25), so multiply by 100 to print percent points.
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(1)
}

/// Status badge colour: green while live, yellow before, grey after or off.
fn status_color(status: OfferStatus, enabled: bool) -> Color {
    if !enabled {
        return color_dark_grey();
    }

    match status {
        OfferStatus::Current => Color::FG_GREEN,
        OfferStatus::Upcoming => Color::FG_YELLOW,
        OfferStatus::Expired => color_dark_grey(),
    }
}

/// Wraps runs of UTF-8 box-drawing characters in ANSI dark-grey escape codes.
///
/// Box-drawing characters occupy the Unicode range U+2500..U+257F. This function
/// scans each character, grouping consecutive border characters and emitting a
/// single grey escape sequence around each run, leaving cell content untouched.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// ANSI dark grey foreground.
fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}
