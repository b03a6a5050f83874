//! VFS backend implementations.

mod host;
mod memory;

pub use host::HostFs;
pub use memory::VirtualFs;
