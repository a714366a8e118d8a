//! Bulletin identifiers and the source-document taxonomy.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Stable identifier for one bulletin, encoding issue number and year.
///
/// The upstream extractor emits the fixed textual pattern `b<issue>_<year>`
/// (e.g. `b103_2020`); the same form is used for ledger lines and persisted
/// file names. Issue numbers are the publisher's raw numbering and may be
/// non-contiguous; chronological rank within a year is derived later by the
/// reshaper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BulletinId {
    pub issue: u32,
    pub year: i32,
}

impl BulletinId {
    pub fn new(issue: u32, year: i32) -> Self {
        Self { issue, year }
    }

    /// Sort key: year first, then issue number within the year.
    pub fn sort_key(&self) -> (i32, u32) {
        (self.year, self.issue)
    }
}

impl Ord for BulletinId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for BulletinId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for BulletinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}_{}", self.issue, self.year)
    }
}

impl FromStr for BulletinId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || format!("Unknown bulletin identifier: {s}");
        let body = s.trim().strip_prefix('b').ok_or_else(err)?;
        let (issue, year) = body.split_once('_').ok_or_else(err)?;
        if year.len() != 4 {
            return Err(err());
        }
        Ok(BulletinId {
            issue: issue.parse().map_err(|_| err())?,
            year: year.parse().map_err(|_| err())?,
        })
    }
}

/// Source-document era. Bulletin layouts changed enough across ~25 years
/// that cleaning pipelines are selected per era.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Era {
    Older,
    Newer,
}

impl Era {
    pub const ALL: [Era; 2] = [Era::Older, Era::Newer];

    /// Directory-name form used in persisted paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Era::Older => "older",
            Era::Newer => "newer",
        }
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Era {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "older" => Ok(Era::Older),
            "newer" => Ok(Era::Newer),
            _ => Err(format!("Unknown era: {s}")),
        }
    }
}

/// Table type: each bulletin carries one monthly-periods table and one
/// quarterly table (the quarterly table also holds annual columns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Frequency {
    Monthly,
    Quarterly,
}

impl Frequency {
    pub const ALL: [Frequency; 2] = [Frequency::Monthly, Frequency::Quarterly];

    /// Directory-name form used in persisted paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            _ => Err(format!("Unknown frequency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulletin_id_round_trip() {
        let id = BulletinId::new(103, 2020);
        assert_eq!(id.to_string(), "b103_2020");
        assert_eq!("b103_2020".parse::<BulletinId>().unwrap(), id);
    }

    #[test]
    fn test_bulletin_id_rejects_malformed() {
        assert!("103_2020".parse::<BulletinId>().is_err());
        assert!("b103-2020".parse::<BulletinId>().is_err());
        assert!("b103_20".parse::<BulletinId>().is_err());
        assert!("bx_2020".parse::<BulletinId>().is_err());
    }

    #[test]
    fn test_bulletin_sort_is_year_then_issue() {
        let mut ids = vec![
            BulletinId::new(2, 2021),
            BulletinId::new(110, 2020),
            BulletinId::new(9, 2020),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                BulletinId::new(9, 2020),
                BulletinId::new(110, 2020),
                BulletinId::new(2, 2021),
            ]
        );
    }

    #[test]
    fn test_era_and_frequency_parse() {
        assert_eq!("Older".parse::<Era>().unwrap(), Era::Older);
        assert_eq!("monthly".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert!("weekly".parse::<Frequency>().is_err());
    }
}
