use std::fmt::Display;

use strum_macros::Display;

/// Pipeline stage (or outer layer) where an error originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Stage {
    Input,
    Season,
    Completeness,
    Extractor,
    Standardizer,
    Combiner,
    Correlator,
    Regional,
    Monthly,
    Market,
    Config,
    Output,
}

/// Structural error: shape mismatches, invalid months, missing reference points.
/// Degenerate statistics are never reported through this type, they surface as NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateError {
    stage: Stage,
    msg: String,
}

impl ClimateError {
    pub fn new(stage: Stage, msg: impl Into<String>) -> Self {
        ClimateError {
            stage,
            msg: msg.into(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn message(&self) -> &str {
        &self.msg
    }
}

impl From<String> for ClimateError {
    fn from(msg: String) -> Self {
        ClimateError {
            stage: Stage::Input,
            msg,
        }
    }
}

impl From<&str> for ClimateError {
    fn from(msg: &str) -> Self {
        ClimateError {
            stage: Stage::Input,
            msg: msg.into(),
        }
    }
}

impl From<ClimateError> for String {
    fn from(value: ClimateError) -> String {
        value.to_string()
    }
}

impl Display for ClimateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.stage, self.msg)
    }
}

impl std::error::Error for ClimateError {}

pub type ClimateResult<T> = Result<T, ClimateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_stage() {
        let err = ClimateError::new(Stage::Correlator, "season axes differ");
        assert_eq!(err.to_string(), "[Correlator] season axes differ");
        assert_eq!(err.stage(), Stage::Correlator);
    }

    #[test]
    fn plain_messages_default_to_input() {
        let err: ClimateError = "file not found".into();
        assert_eq!(err.stage(), Stage::Input);
        assert_eq!(err.message(), "file not found");
    }
}
