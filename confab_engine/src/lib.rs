#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const CONFAB_VERSION: &str = env!("CARGO_PKG_VERSION");

// Core modules
pub mod bank;
pub mod codec;
pub mod loader;
pub mod registry;
mod wire;

// Re-exports for convenience
pub use bank::{load_bank, save_bank};
pub use codec::{BinReader, BinWriter, NodeReader, NodeWriter, WireError};
pub use registry::{Mode, Registry, RegistryError};
