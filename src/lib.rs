#![forbid(unsafe_code)]

//! Collects the latest long-form uploads from a list of YouTube channels into
//! a single JSON snapshot.

pub mod api;
pub mod channel;
pub mod config;
pub mod duration;
pub mod error;
pub mod identifiers;
pub mod pipeline;
pub mod snapshot;
pub mod uploads;

pub use error::{Error, Result};
