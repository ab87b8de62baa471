//! Agent Control Plane Library
//!
//! Runs named, pluggable agents asynchronously on request, tracks each
//! invocation as a job, and answers status queries without blocking.

pub mod agents;
pub mod api;
pub mod config;
