//! Persistence module
//!
//! File-based storage: cache snapshots and the catch table CSV.

pub mod csv_table;
pub mod snapshot_store;

pub use csv_table::{
    CsvTableConfig, output_headers, read_catch_table, read_catch_table_from_path,
    write_catch_table, write_catch_table_to_path,
};
pub use snapshot_store::{FileSnapshotStore, SNAPSHOT_VERSION, SnapshotFormat};
