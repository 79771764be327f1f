use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{ProviderMapping, ResourceId};

/// Hardware configuration (a.k.a. flavor or instance type).
///
/// Configurations are totally ordered by capacity: cpu count first, then
/// memory, then disk. Name and id break the remaining ties so that two
/// distinct configurations never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfiguration {
    id: ResourceId,
    name: String,
    cpu: u32,
    /// MiB
    memory: u64,
    /// GiB
    #[serde(default)]
    disk: u64,
    #[serde(default)]
    mappings: Vec<ProviderMapping>,
}

impl MachineConfiguration {
    pub fn new(
        id: impl Into<ResourceId>,
        name: impl Into<String>,
        cpu: u32,
        memory: u64,
        disk: u64,
        mappings: Vec<ProviderMapping>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cpu,
            memory,
            disk,
            mappings,
        }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cpu(&self) -> u32 {
        self.cpu
    }

    pub fn memory(&self) -> u64 {
        self.memory
    }

    pub fn disk(&self) -> u64 {
        self.disk
    }

    pub fn mappings(&self) -> &[ProviderMapping] {
        &self.mappings
    }

    fn capacity_key(&self) -> (u32, u64, u64, &str, &ResourceId) {
        (self.cpu, self.memory, self.disk, self.name.as_str(), &self.id)
    }
}

impl Ord for MachineConfiguration {
    fn cmp(&self, other: &Self) -> Ordering {
        self.capacity_key().cmp(&other.capacity_key())
    }
}

impl PartialOrd for MachineConfiguration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
