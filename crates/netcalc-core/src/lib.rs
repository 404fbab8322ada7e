//! Textbook networking calculators: slow-start growth, statistical
//! multiplexing, delay and utilization formulas, and the worksheet runner
//! that evaluates batches of them.

pub mod backoff;
pub mod delay;
pub mod error;
pub mod multiplexing;
pub mod report;
pub mod routing;
pub mod rtt;
pub mod runner;
pub mod samples;
pub mod slowstart;
pub mod stuffing;
pub mod tcp;
pub mod units;
pub mod utilization;

pub use error::{Error, Result};
pub use multiplexing::schedule;
pub use report::{Answer, ProblemOutcome, WorksheetReport};
pub use runner::{run_worksheet, solve};
pub use slowstart::simulate;
