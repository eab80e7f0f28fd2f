//! ============================================================================
//! Pantry Module - In-memory inventory and shopping-list stores
//! ============================================================================
//! Both stores live for the process lifetime only. Items are addressed by
//! position, so neither store supports reordering or removal.
//! ============================================================================

mod grocery;
mod inventory;

pub use grocery::GroceryList;
pub use inventory::{food_icon, Inventory, DEFAULT_ICON};
