//! Custom actions for the Product actor.
//!
//! Stock and sold-count only ever change through these actions, never through a
//! plain update, so every stock movement goes through the same floor rules.

/// Custom actions for Product records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductAction {
    /// Reads the current stock level without modifying it.
    CheckStock,
    /// Units leave the shelf: stock drops (floored at 0) and sold count rises.
    Sell(u32),
    /// Units come back: stock rises and sold count drops (floored at 0).
    Restock(u32),
    /// Rewrites the denormalised seller name.
    RenameSeller(String),
}

/// Stock figures after a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLevel {
    pub stock: u32,
    pub sold_count: u32,
}

/// Results from [`ProductAction`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductActionResult {
    /// Result from CheckStock: the current stock level.
    CheckStock(u32),
    /// Result from Sell and Restock.
    Stock(StockLevel),
    /// Result from RenameSeller.
    Renamed,
}
