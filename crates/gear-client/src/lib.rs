//! # gear-client
//!
//! Typed client for the gear container supervisor daemon's HTTP control API.
//!
//! The daemon is the sole source of truth for unit lifecycle state; this
//! crate only drives its API:
//! - Create, existence check, remove, and list operations on named units
//! - Port-forward and inter-container link rules
//! - A uniform error carrying the daemon's status code and response body
//! - A small polling helper for callers that wait on daemon-reported
//!   sub-states
//!
//! The client keeps no state between calls and performs no retries; waiting
//! for a unit to actually serve traffic is a caller concern (see
//! [`poll`]).

#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod poll;
pub mod unit;

pub use client::{GEAR_PORT, GearClient};
pub use error::{ClientError, GearError, GearResult};
pub use unit::{PortMap, Unit};
