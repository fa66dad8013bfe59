pub mod config;
pub mod error;
pub mod evaluations;
pub mod output;
pub mod proposals;
pub mod report;
pub mod scoring;
pub mod script;
pub mod session;
pub mod stderr_buffer;
pub mod tui;
