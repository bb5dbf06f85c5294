//! Application layer orchestrating plugin verification and exercise.
//!
//! The flow is loader -> verifier -> factory invocation -> conformance
//! validation -> selected harness mode. Every step runs sequentially on the
//! calling thread.

pub mod conformance;
pub mod harness;
pub mod verify;
