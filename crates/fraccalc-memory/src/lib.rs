//! # fraccalc-memory
//!
//! Storage management for the `FracCalc` workspace.
//!
//! Provides a slot arena that hands out generation-tagged handles into
//! fixed-capacity buffers, recycles released slots last-in-first-out, and
//! keeps usage statistics.
#![warn(missing_docs)]

pub mod arena;
pub mod stats;

pub use arena::{ArenaError, SlotArena, SlotHandle};
pub use stats::PoolStats;
