//! Downstream publish port trait.
//!
//! Execution, notification, and audit consumers all subscribe to decision
//! results as opaque serializable records.

use crate::domain::engine::DecisionResult;
use crate::domain::error::TickscoreError;

pub trait DecisionSink {
    fn publish(&mut self, result: &DecisionResult) -> Result<(), TickscoreError>;
}
