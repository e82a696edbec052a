use core_types::EMOTIONAL_MISTAKES;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reports: ReportSettings,
    pub logging: LoggingSettings,
    pub server: ServerSettings,
}

/// Parameters for the journal reports.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Mistakes listed by the scheduled batch report.
    pub scheduled_top_n: usize,
    /// Mistakes listed by an ad-hoc, single-user run.
    pub adhoc_top_n: usize,
    /// Mistake names whose presence marks a trade as emotional.
    pub emotional_mistakes: Vec<String>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            scheduled_top_n: 10,
            adhoc_top_n: 5,
            emotional_mistakes: EMOTIONAL_MISTAKES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// How a report run was triggered; decides how many mistakes are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum ReportMode {
    /// The periodic batch over every user.
    Scheduled,
    /// A one-off run, usually for a single user.
    AdHoc,
}

impl ReportMode {
    pub fn top_n(&self, settings: &ReportSettings) -> usize {
        match self {
            ReportMode::Scheduled => settings.scheduled_top_n,
            ReportMode::AdHoc => settings.adhoc_top_n,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "trade-journal.log".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerSettings {
    /// The socket address to listen on, or `None` if `host` is not an IP address.
    pub fn addr(&self) -> Option<SocketAddr> {
        format!("{}:{}", self.host, self.port).parse().ok()
    }
}
