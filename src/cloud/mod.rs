mod account;
mod credentials;
mod hardware;
mod id;
mod image;
mod job;
mod location;
mod machine;
mod mapping;
mod network;

pub use account::{CloudProvider, ProviderAccount};
pub use credentials::Credentials;
pub use hardware::MachineConfiguration;
pub use id::ResourceId;
pub use image::MachineImage;
pub use job::{Job, JobStatus, ResourceRef};
pub use location::{Location, LocationConstraint};
pub use machine::Machine;
pub use mapping::{ProviderMapping, find_mapping};
pub use network::Network;
