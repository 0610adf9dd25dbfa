//! Training pipeline infrastructure
//!
//! This module runs a trainer over a set of gold examples for several
//! epochs and reports progress through composable observers.

pub mod observers;
pub mod training;

pub use observers::{JsonlObserver, MetricsObserver, MetricsSummary, Observation, ProgressObserver};
pub use training::{TrainingConfig, TrainingExample, TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;
