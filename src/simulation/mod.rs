//! Monte-Carlo simulation runner: samples Gamma-distributed
//! task durations, schedules each sampled DAG, and reports efficiency-ratio
//! statistics over the batch.

pub mod gamma_sampler;
pub mod runner;
pub mod statistics;

pub use gamma_sampler::GammaSampler;
pub use runner::{run_batch, SimulationConfig, SimulationRecord};
pub use statistics::{compute as compute_statistics, ecdf, histogram, validate_theoretical, SampleStatistics, TheoreticalValidation, HISTOGRAM_BINS};
