pub mod cli;
pub mod config;
pub mod goal;
pub mod logging;
pub mod valuation;
