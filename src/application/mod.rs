// Application layer - use cases on top of the in-memory ballot.
// The service owns the store, loads on open and saves after each change.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
