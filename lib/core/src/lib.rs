//! Core domain types and utilities for the scorecard client.
//!
//! This crate provides the foundational types shared by the access-control
//! core and its front ends: the rootcause-based `Result` alias, the
//! strongly-typed user identifier and the clock abstraction used for
//! session expiry.

pub mod clock;
pub mod error;
pub mod id;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::Result;
pub use id::{ParseIdError, UserId};
