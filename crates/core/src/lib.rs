//! `stockcast-core` — demand forecasting building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no model fitting,
//! no remote services).

pub mod category;
pub mod error;
pub mod forecast;
pub mod id;
pub mod sales;
pub mod value_object;

pub use category::Category;
pub use error::{DomainError, DomainResult};
pub use forecast::{Forecast, HORIZON};
pub use id::{MaterialId, RunId};
pub use sales::SalesHistory;
pub use value_object::ValueObject;
