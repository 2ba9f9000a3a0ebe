//! Board session configuration.
//!
//! # Invariants
//! - A normalized config never carries a zero history limit.

/// Undo steps kept per session when nothing else is configured.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;
/// Placeholder catalog size used for a fresh board.
pub const DEFAULT_CATALOG_SIZE: usize = 4;
/// Upper bound accepted for generated placeholder catalogs.
pub const MAX_CATALOG_SIZE: usize = 10_000;

/// Tunables for one board session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    /// Maximum number of undo steps retained.
    pub history_limit: usize,
    /// Number of placeholder items generated when no snapshot exists.
    pub catalog_size: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            catalog_size: DEFAULT_CATALOG_SIZE,
        }
    }
}

impl BoardConfig {
    /// Replaces out-of-range values with defaults or bounds.
    pub fn normalized(self) -> Self {
        let history_limit = match self.history_limit {
            0 => DEFAULT_HISTORY_LIMIT,
            value => value,
        };
        Self {
            history_limit,
            catalog_size: self.catalog_size.min(MAX_CATALOG_SIZE),
        }
    }
}
