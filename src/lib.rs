//! cmr-search library
//!
//! Request adapters for the CMR collection and granule search APIs.

pub mod cli;
pub mod config;
pub mod logging;
pub mod search;
