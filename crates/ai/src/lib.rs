//! `stockcast-ai`
//!
//! **Responsibility:** remote text-classification / text-generation boundary.
//!
//! The forecasting core only sees two narrow ports:
//! - [`ClassificationPort`]: sales history → free-text category label
//! - [`RecommendationPort`]: (forecast, category) → inventory action text
//!
//! Adapters here back them with Azure OpenAI chat completions, with blocking
//! callables, or with fixed responses for tests and dry runs.

pub mod azure;
pub mod blocking;
pub mod config;
pub mod error;
pub mod fixed;
pub mod port;
pub mod prompt;

pub use azure::AzureOpenAiClient;
pub use blocking::{Blocking, SyncClassifier, SyncRecommender};
pub use config::{AiConfig, ConfigError};
pub use error::ServiceError;
pub use fixed::{FixedClassifier, FixedRecommender};
pub use port::{ClassificationPort, RecommendationPort};
