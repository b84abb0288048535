//! Trip processing pipeline.

mod batch;
mod stats;
mod trip;

pub use batch::{BatchConfig, BatchRunner};
pub use stats::BatchStats;
pub use trip::{ClassificationOutcome, TripOutcome, TripPipeline};
