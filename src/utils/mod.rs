//! Utility functions and helpers.

pub mod http;
pub mod markdown;

pub use markdown::{compose_message, escape};
