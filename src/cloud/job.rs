use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Machine, ResourceId};

#[allow(unused)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Running,
    Success,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Running => "running",
            JobStatus::Success => "success",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource touched by a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceRef {
    Machine(Machine),
    Other { id: ResourceId },
}

#[allow(unused)]
impl ResourceRef {
    pub fn id(&self) -> &ResourceId {
        match self {
            ResourceRef::Machine(machine) => machine.id(),
            ResourceRef::Other { id } => id,
        }
    }
}

/// Handle on an asynchronous backend operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    id: ResourceId,
    status: JobStatus,
    #[serde(default)]
    affected_resources: Vec<ResourceRef>,
}

#[allow(unused)]
impl Job {
    pub fn new(id: impl Into<ResourceId>, status: JobStatus, affected_resources: Vec<ResourceRef>) -> Self {
        Self {
            id: id.into(),
            status,
            affected_resources,
        }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn affected_resources(&self) -> &[ResourceRef] {
        &self.affected_resources
    }

    /// The machine a creation job produced: its first affected resource.
    pub fn created_machine(&self) -> Option<&Machine> {
        match self.affected_resources.first()? {
            ResourceRef::Machine(machine) => Some(machine),
            ResourceRef::Other { .. } => None,
        }
    }
}
