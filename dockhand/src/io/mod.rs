//! Side-effecting adapters: configuration, processes, container runtime and
//! hosting CLI.

pub mod config;
pub mod environment;
pub mod executor;
pub mod gh;
pub mod process;
