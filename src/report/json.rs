use super::Report;
use crate::error::Result;

/// JSON report file renderer
pub struct JsonReporter;

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, report: &Report) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}
