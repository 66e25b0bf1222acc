//! Reusable view components.

pub mod data_table;

pub use data_table::{Align, DataTable, EMPTY_MESSAGE, TableColumn, or_dash};
