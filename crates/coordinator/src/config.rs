use crate::intent::TransferIntent;
use std::path::PathBuf;

/// Everything one coordinator run needs
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Audit log, appended to across runs
    pub log_file: PathBuf,

    /// The transfer to coordinate
    pub intent: TransferIntent,
}

impl CoordinatorConfig {
    pub fn new(log_file: impl Into<PathBuf>, intent: TransferIntent) -> Self {
        Self {
            log_file: log_file.into(),
            intent,
        }
    }
}
