use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// A phantom-typed string identifier. `TaskId` and `WorkerId` are both
/// `Id<T>` instantiations so the compiler rejects mixing them up even
/// though the underlying representation (a caller-supplied opaque string)
/// is the same.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T> {
    id: String,
    #[serde(skip)]
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(id: impl Into<String>) -> Self {
        Id { id: id.into(), _marker: PhantomData }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full_name = std::any::type_name::<T>();
        let clean_name = full_name.split("::").last().unwrap_or(full_name);
        write!(f, "{}({:?})", clean_name.replace("Tag", "Id"), self.id)
    }
}

impl<T> From<Id<T>> for String {
    fn from(wrapped: Id<T>) -> Self {
        wrapped.id
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TaskTag;
#[derive(Debug, Clone, Copy)]
pub struct WorkerTag;

/// Opaque, caller-stable task identifier.
pub type TaskId = Id<TaskTag>;
/// Fixed-identity compute resource identifier.
pub type WorkerId = Id<WorkerTag>;
