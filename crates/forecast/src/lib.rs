//! `stockcast-forecast`
//!
//! **Responsibility:** category-driven demand forecasting.
//!
//! - Three forecasting strategies, each with its own minimum-history policy.
//! - A selector that routes a free-text category label to one strategy.
//! - Deterministic and side-effect free: no IO, no remote services.

pub mod agent;
pub mod arima;
pub mod error;
pub mod moving_average;
pub mod seasonal;
pub mod selector;
mod stats;

pub use agent::{ForecastAgent, ForecastMethod, ForecastOutcome, Strategy};
pub use arima::ArimaAgent;
pub use error::ForecastError;
pub use moving_average::MovingAverageAgent;
pub use seasonal::{SeasonalAgent, TIMELINE_START};
pub use selector::{FitFailurePolicy, StrategySelector};
