//! The ODP-IP coalition-structure solver bridge: wire protocol client
//! and subset-value construction.

pub mod bridge;
pub mod driver;
pub mod subset;

pub use bridge::SolverClient;
pub use driver::{plan_coalitions, plan_coalitions_with_mode, PartitioningMode};
pub use subset::{build_coalition_values, mask_to_subset, subset_to_mask, SubsetValueFormula, MAX_AGENTS};
