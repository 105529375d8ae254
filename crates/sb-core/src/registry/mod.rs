mod registry_error;
mod service_descriptor;
mod service_registry;

pub use registry_error::{RegistryError, RegistryResult};
pub use service_descriptor::{ServiceDescriptor, SetupStep};
pub use service_registry::Registry;
