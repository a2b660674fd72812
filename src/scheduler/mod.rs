//! List-scheduling algorithms: five variants behind the
//! shared [`Scheduler`] trait, plus the coalition-driven ODP-IP driver that
//! consumes a partition computed by `solver::bridge`.

mod common;
pub mod cp_greedy;
pub mod cp_heft;
pub mod greedy;
pub mod heft;
pub mod odp_ip;
pub mod peft;
mod traits;

pub use cp_greedy::CpGreedyScheduler;
pub use cp_heft::CpHeftScheduler;
pub use greedy::GreedyScheduler;
pub use heft::HeftScheduler;
pub use odp_ip::{Coalition, OdpIpScheduler};
pub use peft::PeftScheduler;
pub use traits::{Scheduler, SchedulerKind};
