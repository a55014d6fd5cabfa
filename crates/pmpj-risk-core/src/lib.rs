//! Risk rating engine for notaries under the PMPJ (know-your-service-user)
//! regime.
//!
//! Data flows one way: category counts → inherent risk; Q1 answer plus
//! document evidence → internal control; both → residual risk; residual
//! severity plus client volume → final tier; the result is merged into the
//! record table by NIK.

pub mod config;
pub mod error;
pub mod evidence;
pub mod records;
pub mod scoring;
pub mod submission;
pub mod tables;
pub mod types;

pub use error::PmpjError;
pub use types::*;

/// Standard result type for all PMPJ risk operations
pub type PmpjResult<T> = Result<T, PmpjError>;
