//! Aggregate counters for the dashboard overview.

pub mod handlers;
