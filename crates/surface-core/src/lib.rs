#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Shared data model for the live surface synchronization engine.
//!
//! Everything in this crate is pure data: the surface payload wire schema,
//! the validator, the rotation transition function, and the session entity.
//! No I/O happens here.

pub mod model;
pub mod rotation;
pub mod session;
pub mod validate;

mod ids;
mod time;

pub use ids::SessionId;
pub use time::now_ms;
