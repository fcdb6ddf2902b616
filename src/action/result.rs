use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// Error code prefix of every successful result.
pub const SUCCESS: &str = "SUCCESS";

/// Diagnostic record produced at every expansion of the prediction tree.
///
/// Only the first seven characters of `error` decide success, so oracles
/// may refine the code (`SUCCESS_SLOW`) without breaking classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    error: String,
    command: String,
    reason: String,
    suggestion: String,
    developer: String,
}

impl ActionResult {
    pub fn new(error: &str, command: &str, reason: &str, suggestion: &str, developer: &str) -> Self {
        Self {
            error: error.to_string(),
            command: command.to_string(),
            reason: reason.to_string(),
            suggestion: suggestion.to_string(),
            developer: developer.to_string(),
        }
    }
    pub fn ok(command: &str) -> Self {
        Self::new(SUCCESS, command, "", "", "")
    }
    pub fn fail(failure: Failure, command: &str, reason: &str, suggestion: &str, developer: &str) -> Self {
        Self::new(failure.code(), command, reason, suggestion, developer)
    }

    pub fn error(&self) -> &str {
        &self.error
    }
    pub fn command(&self) -> &str {
        &self.command
    }
    pub fn reason(&self) -> &str {
        &self.reason
    }
    pub fn suggestion(&self) -> &str {
        &self.suggestion
    }
    pub fn developer(&self) -> &str {
        &self.developer
    }

    pub fn success(&self) -> bool {
        self.error.starts_with(SUCCESS)
    }
    /// Classification of the failure, `None` on success.
    pub fn failure(&self) -> Option<Failure> {
        match self.success() {
            true => None,
            false => Some(Failure::from(self.error.as_str())),
        }
    }
    pub fn is_fatal(&self) -> bool {
        self.failure().is_some_and(|f| f.is_fatal())
    }
    /// Resets the text fields; the command stays.
    pub fn clear(&mut self) {
        self.error.clear();
        self.reason.clear();
        self.suggestion.clear();
        self.developer.clear();
    }
    /// `[error, command, reason, suggestion, developer]`
    pub fn fields(&self) -> [String; 5] {
        [
            self.error.clone(),
            self.command.clone(),
            self.reason.clone(),
            self.suggestion.clone(),
            self.developer.clone(),
        ]
    }
}

impl std::fmt::Display for ActionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.success() {
            true => write!(f, "ACTION: '{}' : SUCCESS", self.command),
            false => write!(
                f,
                "ACTION: '{}' ERROR: '{}' REASON: '{}' SUGGESTION: '{}' DEVELOPER: '{}'",
                self.command, self.error, self.reason, self.suggestion, self.developer
            ),
        }
    }
}
