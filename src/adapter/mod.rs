pub mod fs;
pub mod memory;
pub mod session;
pub mod ssh;
