pub mod eft;
pub mod oct;
pub mod upward_rank;

pub use eft::{compute_eft, insertion_slot_start, EftResult, Placement, PlacedTasks};
pub use oct::{compute_oct, mean_oct};
pub use upward_rank::compute_upward_rank;
