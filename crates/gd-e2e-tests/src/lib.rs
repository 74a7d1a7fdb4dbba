//! Test-only crate. See `tests/` for cross-crate scenarios.
