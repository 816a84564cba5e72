//! `stockcast-pipeline`
//!
//! **Responsibility:** per-material orchestration.
//!
//! Classify → select strategy and forecast → recommend → assemble. Stages run
//! strictly in order for one material; materials are independent and may run
//! concurrently. Failures are returned per material, never retried here.

pub mod batch;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod result;

pub use batch::{BatchConfig, MaterialOutcome};
pub use config::PipelineConfig;
pub use error::{PipelineError, Stage};
pub use pipeline::InventoryPipeline;
pub use result::ForecastResult;
