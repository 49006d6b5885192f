//! Concrete oracle implementations backing the quest service.
mod inventory;
mod world;

pub use inventory::SharedInventory;
pub use world::TerminalRegistry;
