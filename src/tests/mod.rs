//! # Scenario Tests
//!
//! Whole-face behaviour driven through tick sequences, checked against a
//! host that records every collaborator call.

pub(crate) mod recording_host;
