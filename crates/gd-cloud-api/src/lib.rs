//! GenDrive preference API: library crate for the inference REST server.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `gd-e2e-tests`) can access internal types like `AppState`,
//! `build_router`, and `PreferenceOrchestrator`.

pub mod config;
pub mod db;
pub mod error;
pub mod inference;
pub mod routes;
pub mod state;
pub mod store;
