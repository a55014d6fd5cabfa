//! Risk scoring stages, leaf first: category resolution, inherent risk,
//! internal control, residual risk, client volume and the final tier.
//!
//! Every function here is pure. Lookup misses fall back to documented
//! values instead of failing.

pub mod category;
pub mod client_volume;
pub mod final_risk;
pub mod inherent;
pub mod internal_control;
pub mod residual;
