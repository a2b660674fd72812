use thiserror::Error;

/// Crate-wide error enum. Low-level primitives (EFT, rank, OCT) are total
/// on a valid annotated DAG and never return this type; it is reserved for
/// the boundary (loader, solver bridge) and the scheduler's progress check.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read topology file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse topology JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Workflow graph contains a cycle at or reachable from node '{0}'")]
    Cycle(String),

    #[error("Node '{0}' has a negative execution_time or transfer_time")]
    InvalidDuration(String),

    #[error("Duplicate edge {0} -> {1} in workflow graph")]
    DuplicateEdge(String, String),

    #[error("Edge references unknown node '{0}'")]
    UnknownNodeReference(String),

    #[error("Scheduler made no forward progress with {0} task(s) still unscheduled (cycle or missing dependency)")]
    NoForwardProgress(usize),

    #[error("Subset-value vector length {got} does not match 2^numOfAgents (expected {expected})")]
    SubsetLengthMismatch { got: usize, expected: usize },

    #[error("numOfAgents {0} exceeds the hard cap of 25 (2^25 subset values)")]
    AgentCountOutOfBounds(usize),

    #[error("Partition agent index {0} out of bounds for {1} agents (1-based)")]
    PartitionIndexOutOfBounds(usize, usize),

    #[error("Partition returned by solver does not cover every agent in {{1,..,{0}}}")]
    PartitionIncomplete(usize),

    #[error("Coalition-structure solver request failed: {0}")]
    SolverRequestFailed(#[from] reqwest::Error),

    #[error("Coalition-structure solver returned a non-2xx response: {status} — {details}")]
    SolverResponseError { status: u16, details: String },
}

pub type Result<T> = std::result::Result<T, Error>;
