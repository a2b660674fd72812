pub mod annotated;
pub mod gamma;
pub mod ids;
pub mod topology;
pub mod worker;

pub use annotated::{AnnotatedDag, CpmAnnotation, IncomingEdge};
pub use gamma::GammaParams;
pub use ids::{TaskId, WorkerId};
pub use topology::{Edge, NodeKey, WorkflowNode, WorkflowTopology};
pub use worker::{ProcessorSlot, ScheduledTask, Worker};
