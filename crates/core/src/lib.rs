//! Domain core for sprint delivery tracking.
//!
//! Holds the entity model, the closed status enums, the abstract [`store::Store`]
//! contract, and the three engines that keep the data consistent:
//!
//! - [`metrics`]: pure task and sprint KPI computation
//! - [`cascade`]: hierarchical soft-delete with cascade tagging and audit
//! - [`recalculation`]: derived task fields kept in sync with a project's
//!   workload ratio
//!
//! Nothing in this crate talks to a concrete database.

pub mod cascade;
pub mod deletion;
pub mod error;
pub mod metrics;
pub mod models;
pub mod recalculation;
pub mod status;
pub mod store;
pub mod types;
