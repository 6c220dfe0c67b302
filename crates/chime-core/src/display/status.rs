//! Status messages for operations that have no resource to show.

use std::fmt;

/// One-line outcome of an operation, such as a snooze target that no longer
/// resolves to an active step.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }

    /// Failure for an id that does not resolve to anything active.
    pub fn not_found(what: &str, id: &str) -> Self {
        Self::failure(format!("No active {what} '{id}'"))
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.success { "Success:" } else { "Error:" };
        writeln!(f, "{label} {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_status_display() {
        let success = OperationStatus::success("Snoozed");
        assert_eq!(success.to_string(), "Success: Snoozed\n");

        let missing = OperationStatus::not_found("step", "wake");
        assert!(!missing.success);
        assert_eq!(missing.to_string(), "Error: No active step 'wake'\n");
    }
}
