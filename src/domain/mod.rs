//! Core domain types and logic.

pub mod filing;
pub mod holding;
pub mod transaction;
pub mod document;
pub mod classifier;
pub mod aggregator;
pub mod magnitude;
pub mod intersect;
pub mod pipeline;
pub mod config_validation;
pub mod error;
