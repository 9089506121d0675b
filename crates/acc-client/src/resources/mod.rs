//! Per-subsystem operations, implemented as methods on [`Session`].
//!
//! [`Session`]: crate::Session

mod account;
mod cost;
mod data;
mod hubs;
mod issues;
