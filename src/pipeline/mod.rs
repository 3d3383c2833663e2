//! Pipeline entry points for relay operations.
//!
//! - `deliver`: pick, fetch and send one unvisited comic
//! - `schedule`: batches separated by randomized sleeps
//! - `relay`: build components from configuration and run them

pub mod deliver;
pub mod relay;
pub mod retry;
pub mod schedule;

#[cfg(test)]
pub(crate) mod testing;

pub use deliver::{Deliver, DeliveryCycle, select_unvisited};
pub use relay::{Components, run_once, run_relay, validate_or_report};
pub use retry::{RetryPolicy, retry};
pub use schedule::{Scheduler, pick_interval, shutdown_signal};
