// Library root — exposes internal modules for integration tests in `tests/`.
// Production entry point remains `src/main.rs`.

pub mod error;
pub mod history;
pub mod job;
pub mod report;
pub mod services;
pub mod store;

pub mod cli;
pub mod config;
pub mod logging;
