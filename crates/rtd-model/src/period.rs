//! Target periods and vintages.
//!
//! A *target period* is the month, quarter, or year an estimate refers to.
//! A *vintage* is the bulletin snapshot that reports it, identified by
//! publication year and issue order within that year. Both carry a total
//! chronological order; the period order encodes the publication convention
//! that the quarters of year Y print before the annual figure for Y, which
//! in turn precedes Q1 of Y+1.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Prefix shared by every target-period column in panel outputs.
pub const TP_PREFIX: &str = "tp_";

/// The period a growth-rate estimate refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetPeriod {
    /// A calendar month, `tp_<year>m<month>`.
    Month { year: i32, month: u8 },
    /// A calendar quarter, `tp_<year>q<quarter>`.
    Quarter { year: i32, quarter: u8 },
    /// A full calendar year, `tp_<year>`.
    Year { year: i32 },
}

impl TargetPeriod {
    /// Canonical panel column name (`tp_2019q4`, `tp_2020m1`, `tp_2020`).
    pub fn column_name(&self) -> String {
        match self {
            TargetPeriod::Month { year, month } => format!("{TP_PREFIX}{year}m{month}"),
            TargetPeriod::Quarter { year, quarter } => format!("{TP_PREFIX}{year}q{quarter}"),
            TargetPeriod::Year { year } => format!("{TP_PREFIX}{year}"),
        }
    }

    /// Short form without the column prefix (`2019q4`), used as the
    /// `target_period` index of the release triangle.
    pub fn label(&self) -> String {
        match self {
            TargetPeriod::Month { year, month } => format!("{year}m{month}"),
            TargetPeriod::Quarter { year, quarter } => format!("{year}q{quarter}"),
            TargetPeriod::Year { year } => format!("{year}"),
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            TargetPeriod::Month { year, .. }
            | TargetPeriod::Quarter { year, .. }
            | TargetPeriod::Year { year } => *year,
        }
    }

    /// Position within the year for chronological sorting.
    ///
    /// Months map to 1..=12, quarters to their closing month, and the annual
    /// slot to 13 so that Q4 of year Y sorts before the annual figure for Y,
    /// which sorts before anything in Y+1.
    fn slot(&self) -> u8 {
        match self {
            TargetPeriod::Month { month, .. } => *month,
            TargetPeriod::Quarter { quarter, .. } => quarter * 3,
            TargetPeriod::Year { .. } => 13,
        }
    }

    /// Tie-break for periods sharing a slot, so that `2020m12` and `2020q4`
    /// stay distinct under `Ord`: a quarter closes after its last month, and
    /// the annual figure after its last quarter.
    fn rank(&self) -> u8 {
        match self {
            TargetPeriod::Month { .. } => 0,
            TargetPeriod::Quarter { .. } => 1,
            TargetPeriod::Year { .. } => 2,
        }
    }

    fn sort_key(&self) -> (i32, u8, u8) {
        (self.year(), self.slot(), self.rank())
    }
}

impl Ord for TargetPeriod {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for TargetPeriod {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TargetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for TargetPeriod {
    type Err = String;

    /// Parse either the column form (`tp_2019q4`) or the bare label
    /// (`2019q4`). Strict on shape: month 1..=12, quarter 1..=4, 4-digit year.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.trim().strip_prefix(TP_PREFIX).unwrap_or_else(|| s.trim());
        let err = || format!("Unknown target period: {s}");

        if let Some((year, month)) = split_period(body, 'm') {
            if (1..=12).contains(&month) {
                return Ok(TargetPeriod::Month { year, month });
            }
            return Err(err());
        }
        if let Some((year, quarter)) = split_period(body, 'q') {
            if (1..=4).contains(&quarter) {
                return Ok(TargetPeriod::Quarter { year, quarter });
            }
            return Err(err());
        }
        if body.len() == 4
            && let Ok(year) = body.parse::<i32>()
        {
            return Ok(TargetPeriod::Year { year });
        }
        Err(err())
    }
}

fn split_period(body: &str, sep: char) -> Option<(i32, u8)> {
    let (year, sub) = body.split_once(sep)?;
    if year.len() != 4 {
        return None;
    }
    Some((year.parse().ok()?, sub.parse().ok()?))
}

/// One bulletin's published snapshot of estimates.
///
/// `order` is the 1-based rank of the bulletin's issue number among all
/// issues observed for `year`, not the raw issue number, which compensates
/// for non-contiguous bulletin numbering across eras.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Vintage {
    pub year: i32,
    /// Wide enough that no realistic issue count per year can truncate it.
    pub order: u16,
}

impl Vintage {
    pub fn new(year: i32, order: u16) -> Self {
        Self { year, order }
    }
}

impl fmt::Display for Vintage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m{}", self.year, self.order)
    }
}

impl FromStr for Vintage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, order) = s
            .trim()
            .split_once('m')
            .ok_or_else(|| format!("Unknown vintage: {s}"))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| format!("Unknown vintage: {s}"))?;
        let order = order
            .parse::<u16>()
            .map_err(|_| format!("Unknown vintage: {s}"))?;
        if order == 0 {
            return Err(format!("Unknown vintage: {s}"));
        }
        Ok(Vintage { year, order })
    }
}
