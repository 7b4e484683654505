//! Fatal startup errors.
//!
//! Everything that happens inside a poll degrades to "no data"; the only
//! condition that stops the program is failing to locate an installation root.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// No override was usable and platform discovery found nothing.
    #[error("Steam installation not found; set STEAM_ROOT or pass --root")]
    RootNotFound,
}
