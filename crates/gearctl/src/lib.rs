//! # gearctl
//!
//! Command line tool for driving a gear supervisor daemon: create, probe,
//! remove, and list units over the daemon's HTTP control API.

#![warn(missing_docs)]

pub mod cli;

pub use cli::Cli;
