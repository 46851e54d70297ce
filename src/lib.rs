//! Workspace-level integration test package for FracCalc-rs.
//!
//! The tests live in `tests/`; this library target is intentionally empty.
