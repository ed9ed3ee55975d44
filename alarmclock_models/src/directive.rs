/// Structured output of the remote interpreter: when and why to alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmDirective {
    time_expression: String,
    reason: String,
}

impl AlarmDirective {
    pub fn new(time_expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            time_expression: time_expression.into(),
            reason: reason.into(),
        }
    }

    /// Either an absolute time description or a repeat phrase such as `every 5 minutes`.
    pub fn time_expression(&self) -> &str {
        &self.time_expression
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}
