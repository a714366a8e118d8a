//! Reshaping cleaned bulletin tables into the two dataset views: the
//! chronological vintage panel and the release-indexed revision triangle.

pub mod error;
pub mod frame;
pub mod panel;
pub mod triangle;
pub mod vintage;

pub use error::{ReshapeError, Result};
pub use frame::{format_numeric, parse_f64};
pub use panel::{build_panel, observed_periods, BULLETIN, INDUSTRY, VINTAGE};
pub use triangle::{build_triangle, TARGET_PERIOD};
pub use vintage::{
    assign_vintages, reshape, ReshapeStats, VintageObservation, VintageRecord,
};
