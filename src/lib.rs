// src/lib.rs

//! xkcd relay library
//!
//! Posts random xkcd comics to a Telegram chat without repeats until the
//! whole archive has been shown.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
