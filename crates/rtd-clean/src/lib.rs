//! Table cleaning for extracted bulletin grids.
//!
//! Raw tables arrive as untyped cell grids whose shape drifted across ~25
//! years of bulletin layouts. This crate repairs them into the uniform
//! [`CleanedTable`] contract: two leading sector-label columns followed by
//! period-named numeric columns, one row per canonical industry.
//!
//! The repair catalogue lives in [`ops`]; every operation is a pure function
//! that either applies and returns a modified grid or reports that its
//! precondition did not match. [`dispatch`] selects a fixed ordered sequence
//! of operations per (table frequency, source era) and runs it to the
//! contract.

pub mod cleaned;
pub mod dispatch;
pub mod error;
pub mod ops;
pub mod step;
pub mod text;

pub use cleaned::CleanedTable;
pub use dispatch::{Branch, CleanOutcome, clean};
pub use error::CleanError;
pub use step::{Step, run_steps};
