//! Core types shared across modelgate facilities
//!
//! - **Correlation**: [`RequestId`] tags one pipeline invocation in logs and errors
//! - **Schema constants**: canonical structured-logging field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::RequestId;
