//! Domain error types.

/// Top-level error type for tickscore.
#[derive(Debug, thiserror::Error)]
pub enum TickscoreError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("tick data error: {reason}")]
    TickData { reason: String },

    #[error("invalid signal argument {field}: {reason}")]
    SignalArg { field: String, reason: String },

    #[error("publish error: {reason}")]
    Publish { reason: String },

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TickscoreError> for std::process::ExitCode {
    fn from(err: &TickscoreError) -> Self {
        let code: u8 = match err {
            TickscoreError::Io(_) => 1,
            TickscoreError::ConfigParse { .. }
            | TickscoreError::ConfigMissing { .. }
            | TickscoreError::ConfigInvalid { .. } => 2,
            TickscoreError::TickData { .. } => 3,
            TickscoreError::SignalArg { .. } => 4,
            TickscoreError::Publish { .. } | TickscoreError::Serialize(_) => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = TickscoreError::ConfigMissing {
            section: "engine".into(),
            key: "decision_threshold".into(),
        };
        assert_eq!(err.to_string(), "missing config key [engine] decision_threshold");

        let err = TickscoreError::TickData {
            reason: "bad row".into(),
        };
        assert_eq!(err.to_string(), "tick data error: bad row");
    }

    #[test]
    fn exit_codes_are_stable() {
        let config = TickscoreError::ConfigMissing {
            section: "engine".into(),
            key: "x".into(),
        };
        let data = TickscoreError::TickData { reason: "x".into() };
        // Distinct failure classes map to distinct exit codes.
        assert_ne!(
            format!("{:?}", std::process::ExitCode::from(&config)),
            format!("{:?}", std::process::ExitCode::from(&data))
        );
    }
}
