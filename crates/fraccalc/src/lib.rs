//! FracCalc-rs library: application logic for the fraction self-check tool.

pub mod app;
pub mod config;
pub mod errors;
pub mod selfcheck;
pub mod version;
