//! Progress reporting for the correction loop

pub mod reporter;

pub use reporter::{ProgressReporter, SimpleProgress};
