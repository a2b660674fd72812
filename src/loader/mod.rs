//! JSON topology loading.

pub mod parser;
pub mod topology;

pub use topology::{load_topology, topology_from_dto};
