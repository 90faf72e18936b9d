//! Turns weekly time tracking grids (one row per 30 minute slot, one column
//! per day, one csv per week) into validated activity records and
//! period-scoped statistics that can be compared across weeks, months and
//! years.
//!

pub mod cli;
pub mod dataset;
pub mod error;
pub mod fs;
pub mod grid;
pub mod model;
pub mod stats;
pub mod utils;
