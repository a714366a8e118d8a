//! Filesystem layer: discovering extracted bulletin tables, reading raw
//! grids, the processing ledger, and persisting record stores and datasets.

pub mod discovery;
pub mod error;
pub mod grid;
pub mod ledger;
pub mod output;
pub mod records;

pub use discovery::{discover_bulletins, DiscoveredBulletin};
pub use error::{Result, StoreError};
pub use grid::read_grid;
pub use ledger::{ledger_path, Ledger};
pub use output::{panel_path, triangle_path, write_dataset};
pub use records::{load_records, records_path, save_records};
