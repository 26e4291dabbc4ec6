use std::path::PathBuf;

/// Address the participant listens on unless told otherwise
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Participant service configuration
#[derive(Debug, Clone)]
pub struct ParticipantConfig {
    /// Interface to bind
    pub host: String,

    /// Listening port (0 picks an ephemeral port)
    pub port: u16,

    /// Account record file, read at startup and rewritten on every commit
    pub account_file: PathBuf,

    /// Audit log destination
    pub log_file: PathBuf,
}

impl ParticipantConfig {
    pub fn new(port: u16, account_file: impl Into<PathBuf>, log_file: impl Into<PathBuf>) -> Self {
        Self {
            host: DEFAULT_BIND_HOST.to_string(),
            port,
            account_file: account_file.into(),
            log_file: log_file.into(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
