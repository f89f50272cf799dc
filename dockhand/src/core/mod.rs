//! Deterministic, pure logic shared by the dispatcher.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data (captured output, parsed documents) and return deterministic results
//! suitable for tests.

pub mod classifier;
pub mod operation;
pub mod report;
pub mod run_status;
pub mod types;
pub mod workflow_lint;
