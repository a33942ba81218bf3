//! Topology Chat API — library crate for the chat relay server.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `tc-e2e-tests`) can access `AppState`, `build_router`, and the
//! `DialogueEngine` implementations.

pub mod chat;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod extract;
pub mod routes;
pub mod session;
pub mod state;
