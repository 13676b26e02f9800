pub mod columns;
pub mod config;
pub mod format;
pub mod remote;
pub mod spreadsheet;
