//! Statistics over GEDI L4B gridded aboveground biomass rasters.
//!
//! Each file's variable code, taken from its name, selects the "no data"
//! sentinel that is replaced by NaN before any statistic is computed.

pub mod batch;
pub mod bbox;
pub mod cleaning;
pub mod config;
pub mod error;
pub mod filename;
pub mod readers;
pub mod registry;
pub mod report;
pub mod stats;
