//! Error taxonomy for the inference-and-suggestion core.
//!
//! Every variant is recoverable by the caller: the core never mutates state,
//! so a failed call leaves the current profile and spec untouched and
//! repeating the call yields the same error.

use thiserror::Error;

use crate::compat::ChartCategory;

pub type Result<T, E = AdvisorError> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdvisorError {
    #[error("Empty dataset provided for profiling")]
    EmptyDataset,
    #[error("Unknown chart type '{label}'.")]
    UnrecognizedCategory { label: String },
    #[error("{reason}")]
    IncompatibleStructure {
        category: ChartCategory,
        reason: String,
    },
    #[error("Could not parse command '{command}': no known column was mentioned")]
    UnparseableCommand { command: String },
}

impl AdvisorError {
    /// Short message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            AdvisorError::EmptyDataset => "The dataset contains no rows.".to_string(),
            AdvisorError::UnrecognizedCategory { .. } => "Unknown chart type.".to_string(),
            AdvisorError::IncompatibleStructure { reason, .. } => reason.clone(),
            AdvisorError::UnparseableCommand { .. } => {
                "Command not understood or no matching column found.".to_string()
            }
        }
    }
}
