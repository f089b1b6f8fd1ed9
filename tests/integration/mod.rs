//! Integration tests for patchstate
//!
//! These tests drive a whole in-memory canvas through save and restore
//! cycles and check what lands on disk.

#[path = "../common/mod.rs"]
pub mod common;

pub mod ledger_growth;
