//! Status check pipeline.
//!
//! - `retry`: bounded exponential-backoff fetching
//! - `decision`: change detection against the stored state
//! - `cycle`: one fetch → decide → notify → persist pass
//! - `schedule`: ticker loop and debug single-shot

pub mod cycle;
pub mod decision;
pub mod retry;
mod schedule;

pub use cycle::{CheckSettings, CycleOutcome, StatusChecker};
pub use decision::{Decision, StatusChange, should_notify};
pub use retry::{FetchFailure, RetryPolicy, fetch_with_retry};
