use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportConfig {
    /// Digits after the decimal point in human-readable summaries.
    pub precision: usize,
    /// List multiplexing completions in turn order instead of completion order.
    pub sort_completions_by_turn: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            precision: 6,
            sort_completions_by_turn: false,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ReportConfigOverride {
    pub precision: Option<usize>,
    pub sort_completions_by_turn: Option<bool>,
}

impl ReportConfigOverride {
    pub fn apply_to(&self, config: &mut ReportConfig) {
        if let Some(v) = self.precision {
            config.precision = v;
        }
        if let Some(v) = self.sort_completions_by_turn {
            config.sort_completions_by_turn = v;
        }
    }
}
