//! Market-data port trait.
//!
//! A tick source is a lazy, unbounded, possibly gappy or duplicated
//! sequence of price updates. Reconnect/backoff of a live transport
//! belongs behind this boundary, not in the core.

use crate::domain::bar::Tick;
use crate::domain::error::TickscoreError;

pub trait TickSource {
    /// Next tick in arrival order, or `None` when the source is exhausted
    /// (replay files end; live feeds block instead).
    fn next_tick(&mut self) -> Result<Option<Tick>, TickscoreError>;
}
