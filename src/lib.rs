//! Shape Match (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this package
//! re-exports them as `shape_match::{types,core,adapter}` and owns the
//! runtime configuration of the `shape-match` binary.

pub mod config;

pub use shape_match_adapter as adapter;
pub use shape_match_core as core;
pub use shape_match_types as types;
