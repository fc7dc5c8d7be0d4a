//! Import lifecycle stages

use serde::Serialize;
use std::fmt;

/// Stage of one import attempt
///
/// `Uploaded → Parsed → ValidatedClean | ValidatedWithErrors`; only a clean
/// validation continues to `Normalized → Persisting → Persisted`.
/// `ValidatedWithErrors` is terminal: the caller resubmits a corrected file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStage {
    Uploaded,
    Parsed,
    ValidatedClean,
    ValidatedWithErrors,
    Normalized,
    Persisting,
    Persisted,
}

impl ImportStage {
    pub fn can_transition_to(self, next: ImportStage) -> bool {
        use ImportStage::*;
        matches!(
            (self, next),
            (Uploaded, Parsed)
                | (Parsed, ValidatedClean)
                | (Parsed, ValidatedWithErrors)
                | (ValidatedClean, Normalized)
                | (Normalized, Persisting)
                | (Persisting, Persisted)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ImportStage::ValidatedWithErrors | ImportStage::Persisted
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImportStage::Uploaded => "uploaded",
            ImportStage::Parsed => "parsed",
            ImportStage::ValidatedClean => "validated (clean)",
            ImportStage::ValidatedWithErrors => "validated (has errors)",
            ImportStage::Normalized => "normalized",
            ImportStage::Persisting => "persisting",
            ImportStage::Persisted => "persisted",
        }
    }
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
