pub mod core;
pub mod handles;

// Re-export commonly used items
pub use core::{Handle, NoodleConfig, NoodleError, dispatch, run};
pub use handles::{InodeHandle, InodeRecord, VmAreaHandle, VmAreaRecord};
