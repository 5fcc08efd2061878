// # Local State
//
// `ResourceData` is the Local State of one instance. The store
// implementations persist it between invocations, keyed by resource
// address.

pub mod file;
pub mod memory;
pub mod resource_data;

pub use file::FileStateStore;
pub use memory::MemoryStateStore;
pub use resource_data::ResourceData;
