//! JSON-lines decision sink.
//!
//! One serialized `DecisionResult` per line; the audit-friendly format the
//! downstream consumers tail.

use crate::domain::engine::DecisionResult;
use crate::domain::error::TickscoreError;
use crate::ports::decision_port::DecisionSink;
use std::io::Write;

pub struct JsonlDecisionSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonlDecisionSink<W> {
    pub fn new(writer: W) -> Self {
        JsonlDecisionSink { writer }
    }
}

impl JsonlDecisionSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        JsonlDecisionSink::new(std::io::stdout())
    }
}

impl<W: Write> DecisionSink for JsonlDecisionSink<W> {
    fn publish(&mut self, result: &DecisionResult) -> Result<(), TickscoreError> {
        serde_json::to_writer(&mut self.writer, result)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
