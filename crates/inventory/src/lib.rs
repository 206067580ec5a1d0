//! Inventory domain module.
//!
//! This crate contains business rules for inventory items, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage).

pub mod item;
pub mod query;
pub mod summary;
pub mod validation;

pub use item::{Category, InventoryItem, ItemPatch, LOW_STOCK_THRESHOLD, NewItem, timestamp_now};
pub use query::{ListQuery, SortField, SortOrder};
pub use summary::{CategoryStats, InventorySummary};
pub use validation::{FieldError, ItemDraft, ValidItem, ValidationErrors, validate};
