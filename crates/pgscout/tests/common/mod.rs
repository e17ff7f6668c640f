//! Test infrastructure for the search engine.
//!
//! - [`RecordingConnection`] records every statement and replays canned
//!   responses, so engine behavior can be checked without a database.
//! - Fixture record types and an in-memory [`RecordSource`] for `map`.

#![allow(dead_code)]

pub mod fixtures;
pub mod recording;

pub use fixtures::*;
pub use recording::*;
