//! SQL naming helpers for the MSSQL query layer.

pub mod table;

pub use table::{SqlConfig, TableDescriptor, TableFactory, TableOptions};
