//! Canonical industry codes for the GDP real-time dataset.
//!
//! The dataset tracks growth-rate estimates for headline GDP plus the eight
//! production sectors published in every bulletin era. The set is closed:
//! rows whose sector label does not resolve to one of these codes are
//! dropped by the reshaper.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the canonical GDP sector codes tracked by the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Industry {
    /// Headline gross domestic product.
    Gdp,
    Agriculture,
    Fishing,
    Mining,
    Manufacturing,
    Electricity,
    Construction,
    Commerce,
    Services,
}

impl Industry {
    /// All canonical industries in their fixed publication order.
    ///
    /// Headline GDP first, then sectors in the order bulletins print them.
    /// This order also fixes the column order of the release triangle.
    pub const ALL: [Industry; 9] = [
        Industry::Gdp,
        Industry::Agriculture,
        Industry::Fishing,
        Industry::Mining,
        Industry::Manufacturing,
        Industry::Electricity,
        Industry::Construction,
        Industry::Commerce,
        Industry::Services,
    ];

    /// Returns the canonical lowercase code used in output columns.
    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Gdp => "gdp",
            Industry::Agriculture => "agriculture",
            Industry::Fishing => "fishing",
            Industry::Mining => "mining",
            Industry::Manufacturing => "manufacturing",
            Industry::Electricity => "electricity",
            Industry::Construction => "construction",
            Industry::Commerce => "commerce",
            Industry::Services => "services",
        }
    }

    /// Resolve a sector label from either source language to its code.
    ///
    /// The label must already be normalized (lowercase, diacritics stripped,
    /// whitespace folded); the cleaning crate provides `normalize_label` for
    /// that. Returns `None` for labels outside the closed vocabulary, which
    /// callers treat as a row-level data-quality filter, not an error.
    pub fn from_label(label: &str) -> Option<Industry> {
        let key = label.trim();
        let industry = match key {
            // Headline aggregate
            "gdp" | "gross domestic product" | "pbi" | "producto bruto interno"
            | "pbi global" | "economia total" => Industry::Gdp,
            // Sectors, target-language labels first, then source-language
            "agriculture" | "agriculture and livestock" | "agropecuario" | "agricultura"
            | "sector agropecuario" => Industry::Agriculture,
            "fishing" | "pesca" | "sector pesca" => Industry::Fishing,
            "mining" | "mining and fuel" | "mineria" | "mineria e hidrocarburos"
            | "sector mineria" => Industry::Mining,
            "manufacturing" | "manufactura" | "industria manufacturera"
            | "sector manufactura" => Industry::Manufacturing,
            "electricity" | "electricity and water" | "electricidad"
            | "electricidad y agua" => Industry::Electricity,
            "construction" | "construccion" | "sector construccion" => Industry::Construction,
            "commerce" | "trade" | "comercio" | "sector comercio" => Industry::Commerce,
            "services" | "other services" | "servicios" | "otros servicios" => Industry::Services,
            _ => return None,
        };
        Some(industry)
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Industry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gdp" => Ok(Industry::Gdp),
            "agriculture" => Ok(Industry::Agriculture),
            "fishing" => Ok(Industry::Fishing),
            "mining" => Ok(Industry::Mining),
            "manufacturing" => Ok(Industry::Manufacturing),
            "electricity" => Ok(Industry::Electricity),
            "construction" => Ok(Industry::Construction),
            "commerce" => Ok(Industry::Commerce),
            "services" => Ok(Industry::Services),
            _ => Err(format!("Unknown industry code: {s}")),
        }
    }
}
