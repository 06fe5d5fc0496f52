//! Library side of the sheetmap command-line tool.

pub mod config;
pub mod logging;
pub mod output;
