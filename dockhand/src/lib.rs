//! Command dispatcher for a containerized build toolchain.
//!
//! Each operation either runs one docker-compose sub-action under a timeout
//! and reports its classified output, or inspects the project (environment
//! status, CI workflow runs, workflow and fixture files). Every operation
//! returns plain text; failures become diagnostics, never errors.
//!
//! - **[`core`]**: Pure logic (operation catalog, output classification,
//!   report rendering, run-record and workflow parsing).
//! - **[`io`]**: Side effects (config, child processes, environment probe,
//!   hosting CLI). Each seam is a trait so tests can script it.
//!
//! [`dispatch`] ties the two together; [`serve`] exposes it over stdio.

pub mod core;
pub mod dispatch;
pub mod io;
pub mod logging;
pub mod probe;
pub mod serve;
pub mod status;
pub mod test_cases;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod workflows;
