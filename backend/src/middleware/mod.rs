//! Request middleware for cross-cutting concerns such as trace correlation.

pub mod trace;

pub use trace::Trace;
