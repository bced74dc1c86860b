//! Application layer - commands, queries and their handlers.
//!
//! Handlers orchestrate domain operations over ports and hold no state of
//! their own.

pub mod handlers;
