//! Topology Chat trainer — library crate for offline model training.
//!
//! Checks that the dialogue project's configuration and training data are
//! in place, runs the training command, and locates the model it produced.

pub mod config;
pub mod train;
