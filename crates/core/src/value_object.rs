//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. Sales histories,
/// categories and forecasts are all values: once produced they are only read,
/// so they can be shared freely between pipeline stages and threads.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
