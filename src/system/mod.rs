pub mod cpu;
pub mod memory;
pub mod names;
pub mod platform;
pub mod process;
pub mod sampler;
pub mod snapshot;
