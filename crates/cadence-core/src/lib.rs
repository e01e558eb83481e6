//! Cadence Core - Foundational types for the Cadence tick dispatcher
//!
//! This crate provides the types every other Cadence crate depends on:
//! - `ObjectId` - Stable identifiers for objects in the host object system
//! - Error types and Result alias

mod error;
mod id;

pub use error::{CadenceError, Result};
pub use id::ObjectId;
